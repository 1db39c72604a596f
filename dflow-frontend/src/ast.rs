//! Abstract Syntax Tree for JSON-encoded programs
use super::parser;
use atty::Stream;
use dflow_utils::{DflowResult, Error};
use serde::Deserialize;
use std::path::PathBuf;

/// Corresponds to an individual program file.
#[derive(Debug, Deserialize)]
pub struct ProgramDef {
    /// Function definitions in source order.
    pub functions: Vec<FunctionDef>,
}

impl ProgramDef {
    /// Construct a program from a file or the input stream.
    /// If no file is provided, the input stream must not be a TTY.
    pub fn construct(file: &Option<PathBuf>) -> DflowResult<Self> {
        match file {
            Some(file) => parser::JsonParser::parse_file(file),
            None => {
                if atty::isnt(Stream::Stdin) {
                    parser::JsonParser::parse(std::io::stdin())
                } else {
                    Err(Error::misc(
                        "No file provided and terminal not a TTY".to_string(),
                    ))
                }
            }
        }
    }

    /// Construct a program from a definition using a string.
    pub fn construct_from_str(inp: &str) -> DflowResult<Self> {
        parser::JsonParser::parse(inp.as_bytes())
    }
}

/// AST statement for defining functions.
#[derive(Debug, Deserialize)]
pub struct FunctionDef {
    /// Name of the function.
    pub name: String,
    /// Flat instruction stream, labels included.
    #[serde(default)]
    pub instrs: Vec<InstrDef>,
}

/// A single record of the instruction stream.
///
/// The encoding does not tag records: operations carry an `op` field and
/// labels carry a `label` field. Deciding which one a record is (and
/// rejecting records that are neither) is left to the IR conversion, which
/// can report a precise error.
#[derive(Debug, Default, Deserialize)]
pub struct InstrDef {
    pub op: Option<String>,
    pub label: Option<String>,
    pub dest: Option<String>,
    pub args: Option<Vec<String>>,
    pub labels: Option<Vec<String>>,
    pub funcs: Option<Vec<String>>,
    pub value: Option<serde_json::Value>,
}
