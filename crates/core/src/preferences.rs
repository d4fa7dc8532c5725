//! Plugin preference mapping
//!
//! The hot-code-push plugin keeps its settings in a `<chcp>` block of
//! `config.xml`. Each child element attribute becomes one flat key:
//!
//! ```xml
//! <chcp>
//!     <config-file url="https://cdn.example.com/chcp.json"/>
//!     <local-development enabled="true"/>
//!     <auto-download enabled="false"/>
//! </chcp>
//! ```
//!
//! maps to `config-file`, `local-development.enabled` and
//! `auto-download.enabled`. The `url` attribute of `<config-file>` is the only
//! one addressed by the bare element name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key holding the URL of the plugin's `chcp.json`
pub const CONFIG_FILE_KEY: &str = "config-file";

/// Key holding the local development feature flag
pub const LOCAL_DEV_ENABLED_KEY: &str = "local-development.enabled";

const CONFIG_FILE_ELEMENT: &str = "config-file";
const CONFIG_FILE_ATTRIBUTE: &str = "url";

/// Flat, ordered preference bag of the hot-code-push plugin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginPreferences {
    values: IndexMap<String, String>,
}

impl PluginPreferences {
    /// Create an empty preference bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a preference value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set a preference value, keeping the position of an existing key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Whether local development mode is switched on
    ///
    /// A missing flag counts as disabled.
    pub fn local_development_enabled(&self) -> bool {
        self.get(LOCAL_DEV_ENABLED_KEY)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    /// Enable or disable local development mode
    pub fn set_local_development_enabled(&mut self, enabled: bool) {
        self.set(LOCAL_DEV_ENABLED_KEY, enabled.to_string());
    }

    /// URL of the plugin's `chcp.json`, empty when unset
    pub fn config_file(&self) -> &str {
        self.get(CONFIG_FILE_KEY).unwrap_or_default()
    }

    /// Point the plugin at a new `chcp.json`
    pub fn set_config_file(&mut self, url: impl Into<String>) {
        self.set(CONFIG_FILE_KEY, url);
    }

    /// Iterate over all preferences in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of preferences
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no preference is set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build the flat key for an attribute of a `<chcp>` child element
    pub fn key_for(element: &str, attribute: &str) -> String {
        if element == CONFIG_FILE_ELEMENT && attribute == CONFIG_FILE_ATTRIBUTE {
            CONFIG_FILE_KEY.to_string()
        } else {
            format!("{element}.{attribute}")
        }
    }

    /// Split a flat key back into element and attribute names
    ///
    /// Element names may contain dots, attribute names may not.
    pub fn split_key(key: &str) -> (&str, &str) {
        match key.rsplit_once('.') {
            Some((element, attribute)) => (element, attribute),
            None => (key, CONFIG_FILE_ATTRIBUTE),
        }
    }

    /// Group preferences by element, preserving first-seen element order
    ///
    /// This is the shape the `<chcp>` block is written back in.
    pub fn elements(&self) -> IndexMap<&str, Vec<(&str, &str)>> {
        let mut grouped: IndexMap<&str, Vec<(&str, &str)>> = IndexMap::new();
        for (key, value) in &self.values {
            let (element, attribute) = Self::split_key(key);
            grouped
                .entry(element)
                .or_default()
                .push((attribute, value.as_str()));
        }
        grouped
    }
}

impl<K, V> FromIterator<(K, V)> for PluginPreferences
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
