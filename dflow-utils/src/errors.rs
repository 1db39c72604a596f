//! Errors generated while reading programs and running analyses.
use crate::Id;
use thiserror::Error;

/// Convinience wrapper to represent success or meaningful dflow error.
pub type DflowResult<T> = std::result::Result<T, Error>;

/// Errors generated by the tools in this workspace.
///
/// Every error is an immediate rejection: nothing is retried and no partial
/// output is produced once one of these is returned.
#[derive(Error)]
pub enum Error {
    /// An instruction record is missing a required field or carries
    /// contradictory fields.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Two blocks in the same function ended up with the same name.
    #[error("Malformed input: block name `{0}' is defined more than once")]
    DuplicateBlock(Id),

    /// The requested analysis is not registered.
    #[error(
        "Unknown analysis: {0}. Run with --list-analyses to view registered analyses."
    )]
    UnknownAnalysis(String),

    /// An analysis or alias with this name is already registered.
    #[error("Analysis with name `{0}' is already registered.")]
    AlreadyRegistered(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse program: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Misc(String),
}

impl Error {
    pub fn malformed_input<S: ToString>(msg: S) -> Self {
        Self::MalformedInput(msg.to_string())
    }

    pub fn duplicate_block(name: Id) -> Self {
        Self::DuplicateBlock(name)
    }

    pub fn unknown_analysis<S: ToString>(name: S) -> Self {
        Self::UnknownAnalysis(name.to_string())
    }

    pub fn misc<S: ToString>(msg: S) -> Self {
        Self::Misc(msg.to_string())
    }
}

// this is silly but needed to make the program print something sensible when returning
// a result from `main`
impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self, f)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::misc(format!("Failed to format output: {err}"))
    }
}
