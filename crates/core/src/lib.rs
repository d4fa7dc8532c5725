//! Core types for chcp-local-dev
//!
//! This is the foundation crate that all other workspace crates depend on.
//! It provides:
//! - The immutable build invocation context
//! - The plugin preference mapping
//! - Base error types
//! - The traits the decision engine is written against
//!
//! This crate has no dependencies on other workspace crates.

pub mod context;
pub mod error;
pub mod path;
pub mod preferences;
pub mod traits;

pub use context::BuildContext;
pub use error::{Error, Result};
pub use preferences::PluginPreferences;
pub use traits::{BuildVersionUpdater, BuildVersions, PreferenceStore, Reporter};
