use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used by every fallible constructor and loader in the crate.
pub type Result<T> = std::result::Result<T, WitterError>;

/// Errors raised while building stores or loading datasets.
///
/// Domain rejections (self-follow, duplicate follow, duplicate post or user id)
/// are not errors: those operations report a `bool` and leave state untouched.
#[derive(Debug, Error)]
pub enum WitterError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// CSV reader failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// A value in an input file could not be parsed.
    #[error("{context}: {message}")]
    Parse {
        /// Where the bad value was found (file, line, column).
        context: String,
        /// What was wrong with it.
        message: String,
    },
    /// A configuration file could not be read or decoded.
    #[error("failed to load config {path}: {message}")]
    Config {
        /// Path of the offending file.
        path: PathBuf,
        /// Decoder or reader message.
        message: String,
    },
    /// A caller supplied an argument outside the accepted range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A requested entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl WitterError {
    pub(crate) fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        WitterError::Parse {
            context: context.into(),
            message: message.into(),
        }
    }
}
