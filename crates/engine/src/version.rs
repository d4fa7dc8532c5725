//! Native build version bump
//!
//! The hot-code-push plugin reinstalls the web assets bundled with the app
//! whenever the native build version changes. Bumping it after pointing the
//! app at a local server makes sure the next install starts from a clean
//! cache.
//!
//! Both versions live as attributes of the `<widget>` root:
//! `android-versionCode` (an integer) and `ios-CFBundleVersion` (dotted
//! numbers). When an attribute is missing, the value Cordova would have
//! derived from `version` is taken as the current one. Pre-release suffixes
//! of `version` (`1.0.0-beta`) are ignored.

use crate::xml;
use chcp_config::HookSettings;
use chcp_core::path::AbsPath;
use chcp_core::{BuildContext, BuildVersionUpdater, BuildVersions, Error, Result};
use indexmap::IndexMap;

/// Android build version attribute on `<widget>`
pub const ANDROID_VERSION_CODE: &str = "android-versionCode";

/// iOS build version attribute on `<widget>`
pub const IOS_BUNDLE_VERSION: &str = "ios-CFBundleVersion";

const VERSION: &str = "version";

fn invalid(attribute: &str, value: &str) -> Error {
    Error::InvalidVersion {
        attribute: attribute.to_string(),
        value: value.to_string(),
    }
}

/// Parse a dotted build number where every component must be numeric
fn strict_components(attribute: &str, value: &str) -> Result<Vec<u64>> {
    value
        .trim()
        .split('.')
        .map(|part| part.parse::<u64>().map_err(|_| invalid(attribute, value)))
        .collect()
}

/// Parse the widget `version` the way Cordova does
///
/// Pre-release and build metadata are cut off first (`1.0.0-rc.1` reads as
/// `1.0.0`), then each component contributes its leading digits. A component
/// without leading digits is rejected.
fn version_components(value: &str) -> Result<Vec<u64>> {
    let core = value.trim().split(['-', '+']).next().unwrap_or_default();
    core.split('.')
        .map(|part| {
            let digits = part
                .find(|c: char| !c.is_ascii_digit())
                .map_or(part, |end| &part[..end]);
            digits.parse::<u64>().map_err(|_| invalid(VERSION, value))
        })
        .collect()
}

/// Version code Cordova derives from `major.minor.patch`
fn derived_version_code(version: &str) -> Result<u64> {
    let parts = version_components(version)?;
    let part = |i: usize| parts.get(i).copied().unwrap_or(0);
    part(0)
        .checked_mul(10_000)
        .zip(part(1).checked_mul(100))
        .and_then(|(major, minor)| major.checked_add(minor))
        .and_then(|code| code.checked_add(part(2)))
        .ok_or_else(|| invalid(VERSION, version))
}

/// Next Android `versionCode`
///
/// # Errors
///
/// Returns [`Error::InvalidVersion`] if the current code is not an integer,
/// the widget version has no numeric components, or the result overflows.
pub fn next_android_version_code(current: Option<&str>, version: Option<&str>) -> Result<u64> {
    let (attribute, raw, base) = match (current, version) {
        (Some(code), _) => {
            let base = code
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid(ANDROID_VERSION_CODE, code))?;
            (ANDROID_VERSION_CODE, code, base)
        }
        (None, Some(version)) => (VERSION, version, derived_version_code(version)?),
        (None, None) => return Ok(1),
    };
    base.checked_add(1).ok_or_else(|| invalid(attribute, raw))
}

/// Next iOS `CFBundleVersion`: the last component is incremented
///
/// # Errors
///
/// Returns [`Error::InvalidVersion`] if the base version cannot be parsed or
/// its last component overflows.
pub fn next_ios_bundle_version(current: Option<&str>, version: Option<&str>) -> Result<String> {
    let (attribute, base, mut parts) = match (current, version) {
        (Some(bundle), _) => (
            IOS_BUNDLE_VERSION,
            bundle,
            strict_components(IOS_BUNDLE_VERSION, bundle)?,
        ),
        (None, Some(version)) => (VERSION, version, version_components(version)?),
        (None, None) => return Ok("1".to_string()),
    };

    if let Some(last) = parts.last_mut() {
        *last = last.checked_add(1).ok_or_else(|| invalid(attribute, base))?;
    }
    Ok(parts
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join("."))
}

/// Next values of both build versions from the `<widget>` attributes
fn next_versions(attrs: &IndexMap<String, String>) -> Result<BuildVersions> {
    let version = attrs.get(VERSION).map(String::as_str);
    let android = next_android_version_code(
        attrs.get(ANDROID_VERSION_CODE).map(String::as_str),
        version,
    )?;
    let ios = next_ios_bundle_version(attrs.get(IOS_BUNDLE_VERSION).map(String::as_str), version)?;
    Ok(BuildVersions {
        android: Some(android),
        ios: Some(ios),
    })
}

/// Bumps the build version attributes of `<projectRoot>/config.xml`
#[derive(Debug, Clone, Default)]
pub struct XmlBuildVersion {
    settings: HookSettings,
}

impl XmlBuildVersion {
    /// Updater for the configuration file named by `settings`
    pub fn new(settings: HookSettings) -> Self {
        Self { settings }
    }

    fn load(&self, ctx: &BuildContext) -> Result<(AbsPath, String)> {
        let path = self.settings.config_xml_path(ctx.project_root());
        let content = xml::read_document(path.as_path())?.ok_or_else(|| Error::ConfigMissing {
            path: path.as_path().to_path_buf(),
        })?;
        Ok((path, content))
    }
}

impl BuildVersionUpdater for XmlBuildVersion {
    fn next_build_version(&self, ctx: &BuildContext) -> Result<BuildVersions> {
        let (path, content) = self.load(ctx)?;
        let attrs = xml::widget_attributes(&content, path.as_path())?;
        next_versions(&attrs)
    }

    fn increase_build_version(&self, ctx: &BuildContext) -> Result<BuildVersions> {
        let (path, content) = self.load(ctx)?;

        let mut versions = BuildVersions::default();
        let updated = xml::update_widget_attributes(&content, path.as_path(), |attrs| {
            versions = next_versions(attrs)?;
            if let Some(android) = versions.android {
                attrs.insert(ANDROID_VERSION_CODE.to_string(), android.to_string());
            }
            if let Some(ios) = &versions.ios {
                attrs.insert(IOS_BUNDLE_VERSION.to_string(), ios.clone());
            }
            Ok(())
        })?;
        xml::write_document(path.as_path(), &updated)?;

        tracing::info!(
            android = ?versions.android,
            ios = ?versions.ios,
            "Increased build version"
        );
        Ok(versions)
    }
}
