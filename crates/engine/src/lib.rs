//! Processing engine for chcp-local-dev
//!
//! This crate provides:
//! - The local development decision pipeline (`hook`)
//! - The `config.xml` backed preference store and build version updater
//! - Plugin detection
//! - An in-memory reporter for embedding and tests

pub mod hook;
pub mod plugin;
pub mod report;
pub mod store;
pub mod version;
pub mod xml;

// Re-export error types from core
pub use chcp_core::{Error, Result};

pub use hook::{HEADER, LocalDevHook, Outcome};
pub use plugin::is_plugin_installed;
pub use report::{Level, Message, RecordingReporter};
pub use store::XmlPreferenceStore;
pub use version::XmlBuildVersion;
