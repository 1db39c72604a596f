//! Shared utilities for the dflow workspace.
mod errors;
mod id;
mod out_file;

pub use errors::{DflowResult, Error};
pub use id::{GSym, Id};
pub use out_file::OutputFile;
