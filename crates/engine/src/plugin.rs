//! Detection of the companion hot-code-push plugin

use chcp_config::HookSettings;
use chcp_core::path::AbsPath;

/// Whether the plugin descriptor exists under `<projectRoot>/plugins/`
///
/// Only existence is checked. A check that fails (permissions, broken
/// symlink) counts as "not installed".
pub fn is_plugin_installed(settings: &HookSettings, project_root: &AbsPath) -> bool {
    let descriptor = settings.plugin_descriptor_path(project_root);
    match descriptor.as_path().try_exists() {
        Ok(exists) => {
            tracing::debug!(path = %descriptor, exists, "Checked plugin descriptor");
            exists
        }
        Err(e) => {
            tracing::debug!(path = %descriptor, error = %e, "Plugin descriptor check failed");
            false
        }
    }
}
