//! Error types for Amalgam

use std::path::PathBuf;
use thiserror::Error;

/// Amalgam error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing input: {}: {source}", path.display())]
    MissingInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output: {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input is not valid UTF-8: {}: {source}", path.display())]
    InvalidEncoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for Amalgam
pub type Result<T> = std::result::Result<T, Error>;
