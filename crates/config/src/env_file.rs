//! Environment side file
//!
//! The local development server drops a `.chcpenv` JSON file into the project
//! root describing where it serves content from:
//!
//! ```json
//! {
//!   "content_url": "http://192.168.1.5:8000",
//!   "config_url": "http://192.168.1.5:8000/chcp.json"
//! }
//! ```
//!
//! Only `config_url` drives the hook. The file is read once per invocation and
//! never written.

use chcp_core::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Parsed content of the environment side file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// URL of the dev server's `chcp.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_url: Option<String>,

    /// Everything else the dev server wrote
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl EnvironmentConfig {
    /// Load and parse the side file at `path`
    ///
    /// # Errors
    ///
    /// - [`Error::EnvFileMissing`] if the file does not exist
    /// - [`Error::FileAccess`] if it cannot be read
    /// - [`Error::EnvFileInvalid`] if it is not a JSON object of the expected shape
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::EnvFileMissing {
                path: path.to_path_buf(),
            },
            _ => Error::file_access(path, e),
        })?;

        tracing::debug!(path = %path.display(), "Parsing environment file");

        serde_json::from_str(&content).map_err(|source| Error::EnvFileInvalid {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The configured `config_url`, if present and non-blank
    pub fn config_url(&self) -> Option<&str> {
        self.config_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Load the side file and extract `config_url`
    ///
    /// # Errors
    ///
    /// Everything [`EnvironmentConfig::load`] reports, plus
    /// [`Error::ConfigUrlMissing`] when the field is absent or blank.
    pub fn load_config_url(path: &Path) -> Result<String> {
        let env = Self::load(path)?;
        env.config_url()
            .map(str::to_string)
            .ok_or_else(|| Error::ConfigUrlMissing {
                path: path.to_path_buf(),
            })
    }
}
