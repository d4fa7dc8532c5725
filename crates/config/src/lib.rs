//! Configuration for chcp-local-dev
//!
//! This crate handles:
//! - File locations inside the project (`HookSettings`)
//! - The `.chcpenv` environment side file
//! - Logging initialization

pub mod env_file;
pub mod logging;
pub mod settings;

// Re-export error types from core
pub use chcp_core::{Error, Result};

pub use env_file::EnvironmentConfig;
pub use settings::HookSettings;
