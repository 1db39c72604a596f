pub mod cmdline;
pub mod driver;
