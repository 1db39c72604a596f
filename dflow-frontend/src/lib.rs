//! Frontend for dflow.
//! Deserializes the JSON program encoding into an AST that the IR conversion
//! validates.
pub mod ast;
pub mod parser;

pub use ast::{FunctionDef, InstrDef, ProgramDef};
