//! File locations used by the local development hook
//!
//! The defaults match the layout of a Cordova project with the
//! hot-code-push plugin installed. They can be overridden from the command
//! line, mostly for tests and non-standard project layouts.

use chcp_core::path::AbsPath;
use serde::{Deserialize, Serialize};

/// Default name of the environment side file written by the dev server
pub const DEFAULT_ENV_FILE: &str = ".chcpenv";

/// Default name of the project configuration file
pub const DEFAULT_CONFIG_XML: &str = "config.xml";

/// Plugin id of the companion hot-code-push plugin
pub const DEFAULT_PLUGIN_ID: &str = "cordova-hot-code-push-plugin";

/// Where the hook looks for the files it reads and writes
///
/// All paths are relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HookSettings {
    /// Environment side file holding `config_url`
    pub env_file: String,

    /// Project configuration file holding the `<chcp>` block
    pub config_xml: String,

    /// Directory name of the plugin under `plugins/`
    pub plugin_id: String,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            env_file: DEFAULT_ENV_FILE.to_string(),
            config_xml: DEFAULT_CONFIG_XML.to_string(),
            plugin_id: DEFAULT_PLUGIN_ID.to_string(),
        }
    }
}

impl HookSettings {
    /// Path of the environment side file
    pub fn env_file_path(&self, project_root: &AbsPath) -> AbsPath {
        project_root.join(&self.env_file)
    }

    /// Path of the project configuration file
    pub fn config_xml_path(&self, project_root: &AbsPath) -> AbsPath {
        project_root.join(&self.config_xml)
    }

    /// Path of the plugin descriptor whose presence marks the plugin as installed
    pub fn plugin_descriptor_path(&self, project_root: &AbsPath) -> AbsPath {
        project_root
            .join("plugins")
            .join(&self.plugin_id)
            .join("plugin.xml")
    }
}
