//! State shared by all subcommands

use anyhow::{Context, Result};
use chcp_config::HookSettings;
use chcp_core::path::AbsPath;
use std::path::Path;

/// Resolved project root and file locations for one invocation
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    /// Root of the Cordova project
    pub project_root: AbsPath,
    /// File locations inside the project
    pub settings: HookSettings,
}

impl RuntimeContext {
    /// Context for an already resolved project root
    pub fn new(project_root: AbsPath, settings: HookSettings) -> Self {
        Self {
            project_root,
            settings,
        }
    }

    /// Resolve the project root, falling back to the current directory
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn resolve(project_root: Option<&Path>, settings: HookSettings) -> Result<Self> {
        let project_root = match project_root {
            Some(root) => AbsPath::resolve(root)
                .with_context(|| format!("Invalid project root: {}", root.display()))?,
            None => {
                let cwd = std::env::current_dir().context("Failed to get current directory")?;
                AbsPath::new(cwd)?
            }
        };
        tracing::debug!(project_root = %project_root, "Resolved project root");
        Ok(Self::new(project_root, settings))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_resolve_absolute_root() {
        let ctx = RuntimeContext::resolve(Some(Path::new("/work/app")), HookSettings::default())
            .unwrap();
        assert_eq!(ctx.project_root.as_path(), Path::new("/work/app"));
    }

    #[test]
    fn test_resolve_relative_root_against_cwd() {
        let ctx =
            RuntimeContext::resolve(Some(Path::new("app")), HookSettings::default()).unwrap();
        let expected: PathBuf = std::env::current_dir().unwrap().join("app");
        assert_eq!(ctx.project_root.as_path(), expected);
    }

    #[test]
    fn test_resolve_defaults_to_cwd() {
        let ctx = RuntimeContext::resolve(None, HookSettings::default()).unwrap();
        assert_eq!(ctx.project_root.as_path(), std::env::current_dir().unwrap());
    }
}
