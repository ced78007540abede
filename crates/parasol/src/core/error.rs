use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Result type for parasol operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("not found: {0}")]
    /// Operation on an overlay that is not mounted.
    NotFound(String),
    #[error("invalid: {0}")]
    /// Invalid input or a mismatched widget type.
    Invalid(String),
    #[error("action failed: {0}")]
    /// A confirm or cancel callback failed.
    Action(String),
    #[error("config: {0}")]
    /// Settings could not be read or parsed.
    Config(String),
    #[error("internal: {0}")]
    /// Internal error.
    Internal(String),
}

impl Error {
    /// Construct an action failure from any displayable value.
    pub fn action(msg: impl ToString) -> Self {
        Self::Action(msg.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Config(e.to_string())
    }
}
