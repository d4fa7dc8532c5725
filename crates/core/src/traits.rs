//! Behavioral traits at the seams of the local development hook
//!
//! The decision engine only talks to persistence and the console through
//! these traits. The XML-backed implementations live in `chcp-engine`, the
//! console reporter in the CLI, and tests substitute recording fakes.

use crate::Result;
use crate::context::BuildContext;
use crate::preferences::PluginPreferences;
use serde::Serialize;

/// Access to the plugin preference block of the project configuration
///
/// # Examples
///
/// ```ignore
/// fn enable(store: &dyn PreferenceStore, ctx: &BuildContext) -> Result<()> {
///     let mut prefs = store.read_options(ctx)?.unwrap_or_default();
///     prefs.set_local_development_enabled(true);
///     store.write_options(ctx, &prefs)
/// }
/// ```
pub trait PreferenceStore {
    /// Load the preferences
    ///
    /// Returns `Ok(None)` when the project has no configuration file.
    fn read_options(&self, ctx: &BuildContext) -> Result<Option<PluginPreferences>>;

    /// Save `prefs` as the preference block
    ///
    /// Every key of `prefs` is written. Keys the block holds but `prefs` does
    /// not are removed, while content that carries no preference (comments,
    /// text, elements without attributes) is kept.
    fn write_options(&self, ctx: &BuildContext, prefs: &PluginPreferences) -> Result<()>;
}

/// Native build version values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildVersions {
    /// Android `versionCode`
    pub android: Option<u64>,
    /// iOS `CFBundleVersion`
    pub ios: Option<String>,
}

/// Increments the native build version marker
///
/// A changed build version makes the plugin discard its cached web assets on
/// the next install. Every call increments; there is no idempotence guard.
pub trait BuildVersionUpdater {
    /// Versions the next increment would write, without writing anything
    ///
    /// Lets callers find out that the increment is impossible before they
    /// touch any other file.
    fn next_build_version(&self, ctx: &BuildContext) -> Result<BuildVersions>;

    /// Increment and persist the build version
    fn increase_build_version(&self, ctx: &BuildContext) -> Result<BuildVersions>;
}

/// Console sink for the hook's decision messages
pub trait Reporter {
    /// Banner printed once per invocation before any decision is made
    fn header(&self, title: &str);

    /// Informational message
    fn info(&self, message: &str);

    /// Warning: the hook stopped because the project state does not allow it
    fn warn(&self, message: &str);

    /// Error: the hook stopped because something it needs is broken or missing
    fn error(&self, message: &str);
}
