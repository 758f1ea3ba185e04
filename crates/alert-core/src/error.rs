use std::path::PathBuf;
use thiserror::Error;

/// Reasons a dataset could not be turned into a [`Table`](crate::models::Table).
///
/// Every variant is fatal at startup: the service never runs on a partially
/// loaded table.
#[derive(Error, Debug)]
pub enum LoadError {
    /// No dataset exists at the given (or discovered) location.
    #[error("Dataset not found: {0}")]
    NotFound(PathBuf),

    /// The dataset exists but could not be opened or read.
    #[error("Failed to read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not well-formed CSV (bad quoting, ragged record, bad UTF-8).
    #[error("Malformed dataset {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    /// A column required by the aggregation engine is absent from the header.
    #[error("Dataset {path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    /// A count cell holds something other than an integer.
    #[error("Invalid value '{value}' for column '{column}' on line {line} of {path}")]
    InvalidValue {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },
}

/// All errors produced by AlertIndia.
#[derive(Error, Debug)]
pub enum AlertError {
    /// The dataset could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The dashboard could not set up, draw to or restore the terminal.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// The HTTP server could not bind or stopped abnormally.
    #[error("Server error: {0}")]
    Server(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the AlertIndia crates.
pub type Result<T> = std::result::Result<T, AlertError>;
