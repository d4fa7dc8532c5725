//! Local development decision pipeline
//!
//! One invocation per build-preparation event:
//!
//! 1. load plugin preferences
//! 2. plugin installed?
//! 3. not a release build?
//! 4. local development enabled?
//! 5. (note when `config-file` is empty)
//! 6. load `config_url` from the environment side file
//! 7. set `config-file`
//! 8. check that the build version can be increased
//! 9. save preferences
//! 10. bump the build version
//!
//! Checks run in this order and stop at the first failure, so a stopped run
//! touches no file and reports a single cause. Should the bump still fail
//! after the preferences were saved, the previous preferences are written
//! back. Failures never leave
//! [`LocalDevHook::run`]: the host build must not fail because the hook had
//! nothing to do.

use crate::plugin::is_plugin_installed;
use crate::store::XmlPreferenceStore;
use crate::version::XmlBuildVersion;
use chcp_config::{EnvironmentConfig, HookSettings};
use chcp_core::context::RELEASE_FLAG;
use chcp_core::preferences::CONFIG_FILE_KEY;
use chcp_core::{
    BuildContext, BuildVersionUpdater, BuildVersions, PluginPreferences, PreferenceStore, Reporter,
};
use serde::Serialize;

/// Banner printed before any decision is made
pub const HEADER: &str = "CHCP Local Development Add-on";

/// Terminal node reached by one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Outcome {
    /// Preferences rewritten and build version bumped
    Applied {
        config_url: String,
        versions: BuildVersions,
    },
    /// No configuration file, or it could not be read
    ConfigUnavailable,
    /// The hot-code-push plugin is not installed
    PluginMissing,
    /// The invocation builds a release artifact
    ReleaseBuild,
    /// Local development mode is switched off
    Disabled,
    /// The environment side file is missing or unusable
    EnvironmentUnavailable,
    /// The build version cannot be increased; nothing was written
    VersionInvalid,
    /// Saving the preferences failed; nothing was written
    WriteFailed,
    /// Preferences were saved but persisting the new build version failed
    ///
    /// The previous preferences are written back; `restored` tells whether
    /// that worked.
    VersionBumpFailed { restored: bool },
}

impl Outcome {
    /// Whether the full mutation happened
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }
}

/// The local development hook
///
/// Generic over its collaborators so embedders and tests can swap the XML
/// backed implementations.
///
/// # Examples
///
/// ```ignore
/// let reporter = RecordingReporter::new();
/// let hook = LocalDevHook::with_xml_config(HookSettings::default(), &reporter);
/// let outcome = hook.run(&ctx);
/// ```
pub struct LocalDevHook<'a, S = XmlPreferenceStore, U = XmlBuildVersion>
where
    S: PreferenceStore,
    U: BuildVersionUpdater,
{
    settings: HookSettings,
    store: S,
    updater: U,
    reporter: &'a dyn Reporter,
}

impl<'a> LocalDevHook<'a> {
    /// Hook backed by the project `config.xml`
    pub fn with_xml_config(settings: HookSettings, reporter: &'a dyn Reporter) -> Self {
        let store = XmlPreferenceStore::new(settings.clone());
        let updater = XmlBuildVersion::new(settings.clone());
        Self::new(settings, store, updater, reporter)
    }
}

impl<'a, S, U> LocalDevHook<'a, S, U>
where
    S: PreferenceStore,
    U: BuildVersionUpdater,
{
    /// Hook with explicit collaborators
    pub fn new(settings: HookSettings, store: S, updater: U, reporter: &'a dyn Reporter) -> Self {
        Self {
            settings,
            store,
            updater,
            reporter,
        }
    }

    /// The preference store in use
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The build version updater in use
    pub fn updater(&self) -> &U {
        &self.updater
    }

    /// Run the pipeline once for `ctx`
    #[tracing::instrument(skip_all, fields(project_root = %ctx.project_root()))]
    pub fn run(&self, ctx: &BuildContext) -> Outcome {
        self.reporter.header(HEADER);

        let config_xml = self.settings.config_xml_path(ctx.project_root());
        let mut prefs = match self.store.read_options(ctx) {
            Ok(Some(prefs)) => prefs,
            Ok(None) => {
                tracing::error!(path = %config_xml, "Configuration file not found");
                self.reporter.error(&format!(
                    "{} not found in {}. Local development mode can't be configured.",
                    self.settings.config_xml,
                    ctx.project_root()
                ));
                return Outcome::ConfigUnavailable;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read plugin preferences");
                self.reporter
                    .error(&format!("Failed to read plugin preferences: {e}"));
                return Outcome::ConfigUnavailable;
            }
        };

        if !is_plugin_installed(&self.settings, ctx.project_root()) {
            tracing::warn!(plugin = %self.settings.plugin_id, "Plugin not installed");
            self.reporter.warn(&format!(
                "{} is not installed. Install it before using local development mode.",
                self.settings.plugin_id
            ));
            return Outcome::PluginMissing;
        }

        if ctx.is_release() {
            tracing::warn!("Release build detected");
            self.reporter.warn(&format!(
                "Build is running with {RELEASE_FLAG}. Local development mode is never applied to release builds."
            ));
            return Outcome::ReleaseBuild;
        }

        if !prefs.local_development_enabled() {
            tracing::info!("Local development mode disabled");
            self.reporter
                .info("Local development mode is disabled. Nothing to do.");
            return Outcome::Disabled;
        }

        if prefs.config_file().is_empty() {
            self.reporter.info(&format!(
                "{CONFIG_FILE_KEY} preference is empty: local development mode is active by default."
            ));
        }

        let env_path = self.settings.env_file_path(ctx.project_root());
        let config_url = match EnvironmentConfig::load_config_url(env_path.as_path()) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(path = %env_path, error = %e, "Environment file unusable");
                self.reporter.error(&format!(
                    "{e}. Start the local development server to generate {}.",
                    self.settings.env_file
                ));
                return Outcome::EnvironmentUnavailable;
            }
        };

        let original = prefs.clone();
        prefs.set_config_file(config_url.clone());

        // Both files change or neither does: check the bump before saving
        if let Err(e) = self.updater.next_build_version(ctx) {
            tracing::error!(error = %e, "Build version cannot be increased");
            self.reporter.error(&format!(
                "Build version cannot be increased: {e}. Nothing was changed."
            ));
            return Outcome::VersionInvalid;
        }

        if let Err(e) = self.store.write_options(ctx, &prefs) {
            tracing::error!(error = %e, "Failed to save plugin preferences");
            self.reporter
                .error(&format!("Failed to save plugin preferences: {e}"));
            return Outcome::WriteFailed;
        }
        self.reporter
            .info(&format!("{CONFIG_FILE_KEY} set to {config_url}"));

        match self.updater.increase_build_version(ctx) {
            Ok(versions) => {
                self.reporter.info(&describe_versions(&versions));
                Outcome::Applied {
                    config_url,
                    versions,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to increase build version");
                self.reporter
                    .error(&format!("Failed to increase build version: {e}"));
                let restored = self.restore(ctx, &original);
                Outcome::VersionBumpFailed { restored }
            }
        }
    }
}

impl<S, U> LocalDevHook<'_, S, U>
where
    S: PreferenceStore,
    U: BuildVersionUpdater,
{
    fn restore(&self, ctx: &BuildContext, original: &PluginPreferences) -> bool {
        match self.store.write_options(ctx, original) {
            Ok(()) => {
                tracing::info!("Restored previous plugin preferences");
                self.reporter
                    .info(&format!("{CONFIG_FILE_KEY} restored to its previous value"));
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to restore plugin preferences");
                self.reporter
                    .error(&format!("Failed to restore plugin preferences: {e}"));
                false
            }
        }
    }
}

fn describe_versions(versions: &BuildVersions) -> String {
    let mut parts = Vec::new();
    if let Some(android) = versions.android {
        parts.push(format!("android-versionCode {android}"));
    }
    if let Some(ios) = &versions.ios {
        parts.push(format!("ios-CFBundleVersion {ios}"));
    }
    if parts.is_empty() {
        "Build version increased".to_string()
    } else {
        format!("Build version increased ({})", parts.join(", "))
    }
}
