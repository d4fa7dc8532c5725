//! Preference store backed by the project `config.xml`

use crate::xml;
use chcp_config::HookSettings;
use chcp_core::{BuildContext, Error, PluginPreferences, PreferenceStore, Result};

/// Reads and writes the `<chcp>` block of `<projectRoot>/config.xml`
#[derive(Debug, Clone, Default)]
pub struct XmlPreferenceStore {
    settings: HookSettings,
}

impl XmlPreferenceStore {
    /// Store for the configuration file named by `settings`
    pub fn new(settings: HookSettings) -> Self {
        Self { settings }
    }
}

impl PreferenceStore for XmlPreferenceStore {
    fn read_options(&self, ctx: &BuildContext) -> Result<Option<PluginPreferences>> {
        let path = self.settings.config_xml_path(ctx.project_root());
        tracing::debug!(path = %path, "Reading plugin preferences");

        let Some(content) = xml::read_document(path.as_path())? else {
            return Ok(None);
        };
        xml::parse_preferences(&content, path.as_path()).map(Some)
    }

    fn write_options(&self, ctx: &BuildContext, prefs: &PluginPreferences) -> Result<()> {
        let path = self.settings.config_xml_path(ctx.project_root());

        let content = xml::read_document(path.as_path())?.ok_or_else(|| Error::ConfigMissing {
            path: path.as_path().to_path_buf(),
        })?;
        let updated = xml::replace_preferences(&content, prefs, path.as_path())?;
        xml::write_document(path.as_path(), &updated)?;

        tracing::info!(path = %path, preferences = prefs.len(), "Saved plugin preferences");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chcp_core::path::AbsPath;
    use std::fs;
    use tempfile::TempDir;

    fn context(temp: &TempDir) -> BuildContext {
        BuildContext::new(AbsPath::new(temp.path().to_path_buf()).unwrap())
    }

    #[test]
    fn test_read_without_config_xml() {
        let temp = TempDir::new().unwrap();
        let store = XmlPreferenceStore::default();

        assert!(store.read_options(&context(&temp)).unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("config.xml"),
            "<widget id=\"com.example\">\n    <name>Example</name>\n</widget>\n",
        )
        .unwrap();
        let store = XmlPreferenceStore::default();
        let ctx = context(&temp);

        let mut prefs = store.read_options(&ctx).unwrap().unwrap();
        assert!(prefs.is_empty());

        prefs.set_local_development_enabled(true);
        prefs.set_config_file("http://192.168.1.5:8000/chcp.json");
        store.write_options(&ctx, &prefs).unwrap();

        let reloaded = store.read_options(&ctx).unwrap().unwrap();
        assert_eq!(reloaded, prefs);
    }

    #[test]
    fn test_write_without_config_xml() {
        let temp = TempDir::new().unwrap();
        let store = XmlPreferenceStore::default();

        let err = store
            .write_options(&context(&temp), &PluginPreferences::new())
            .unwrap_err();
        assert!(matches!(err, Error::ConfigMissing { .. }));
        assert!(!temp.path().join("config.xml").exists());
    }

    #[test]
    fn test_custom_config_location() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("res")).unwrap();
        fs::write(
            temp.path().join("res/app.xml"),
            r#"<widget><chcp><local-development enabled="true"/></chcp></widget>"#,
        )
        .unwrap();
        let store = XmlPreferenceStore::new(HookSettings {
            config_xml: "res/app.xml".to_string(),
            ..HookSettings::default()
        });

        let prefs = store.read_options(&context(&temp)).unwrap().unwrap();
        assert!(prefs.local_development_enabled());
    }
}
