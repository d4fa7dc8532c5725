//! Base error types for chcp-local-dev
//!
//! Every library crate in the workspace reports failures through this enum.
//! The decision engine turns each variant into a console message and an
//! outcome; nothing here is meant to reach the host build tool.

use std::path::PathBuf;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Path is not absolute
    #[error("Path must be absolute: {path}")]
    PathNotAbsolute { path: PathBuf },

    /// The project configuration file does not exist
    #[error("Configuration file not found: {}", path.display())]
    ConfigMissing { path: PathBuf },

    /// Error reading or writing a file
    #[error("Failed to access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed XML in the project configuration
    #[error("Invalid XML in {}: {message}", path.display())]
    Xml { path: PathBuf, message: String },

    /// The configuration has no `<widget>` root element
    #[error("No <widget> element found in {}", path.display())]
    WidgetMissing { path: PathBuf },

    /// The environment side file does not exist
    #[error("Environment file not found: {}", path.display())]
    EnvFileMissing { path: PathBuf },

    /// The environment side file is not a JSON object
    #[error("Environment file {} is not valid JSON: {source}", path.display())]
    EnvFileInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The environment side file has no usable `config_url`
    #[error("Environment file {} does not define config_url", path.display())]
    ConfigUrlMissing { path: PathBuf },

    /// A build version attribute could not be incremented
    #[error("Invalid build version in attribute {attribute}: '{value}'")]
    InvalidVersion { attribute: String, value: String },

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Create an `Xml` error for the given file
    pub fn xml(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Xml {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Create a `FileAccess` error for the given file
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
