//! End-to-end tests of the local development hook against real project files
//!
//! Each test lays out a Cordova project in a temp directory and runs the hook
//! with the `config.xml` backed collaborators.

#![allow(clippy::unwrap_used, clippy::panic)]

use chcp_config::HookSettings;
use chcp_core::BuildContext;
use chcp_core::path::AbsPath;
use chcp_engine::{Level, LocalDevHook, Outcome, RecordingReporter};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONFIG_XML: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<widget id="com.example.app" version="1.0.0" xmlns="http://www.w3.org/ns/widgets">
    <name>Example</name>
    <chcp>
        <config-file url="https://cdn.example.com/www/chcp.json"/>
        <local-development enabled="true"/>
    </chcp>
    <content src="index.html" />
</widget>
"#;

const LOCAL_URL: &str = "http://192.168.1.5:8000/chcp.json";

fn project(config_xml: &str, plugin: bool, env: Option<&str>) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.xml"), config_xml).unwrap();
    if plugin {
        let dir = temp.path().join("plugins/cordova-hot-code-push-plugin");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("plugin.xml"), "<plugin id=\"cordova-hot-code-push-plugin\"/>").unwrap();
    }
    if let Some(env) = env {
        fs::write(temp.path().join(".chcpenv"), env).unwrap();
    }
    temp
}

fn context(root: &Path, options: &[&str]) -> BuildContext {
    BuildContext::new(AbsPath::new(root.to_path_buf()).unwrap())
        .with_options(options.iter().copied())
}

fn read_config(root: &Path) -> String {
    fs::read_to_string(root.join("config.xml")).unwrap()
}

fn env_json(url: &str) -> String {
    format!(r#"{{"content_url":"http://192.168.1.5:8000","config_url":"{url}"}}"#)
}

#[test]
fn test_scenario_a_rewrites_config_and_bumps_version() {
    let env = env_json(LOCAL_URL);
    let temp = project(CONFIG_XML, true, Some(&env));
    let reporter = RecordingReporter::new();
    let hook = LocalDevHook::with_xml_config(HookSettings::default(), &reporter);

    let outcome = hook.run(&context(temp.path(), &["android"]));

    match outcome {
        Outcome::Applied {
            config_url,
            versions,
        } => {
            assert_eq!(config_url, LOCAL_URL);
            assert_eq!(versions.android, Some(10_001));
            assert_eq!(versions.ios.as_deref(), Some("1.0.1"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let config = read_config(temp.path());
    assert!(config.contains(&format!(r#"<config-file url="{LOCAL_URL}"/>"#)));
    assert!(config.contains(r#"<local-development enabled="true"/>"#));
    assert!(config.contains(r#"android-versionCode="10001""#));
    assert!(config.contains(r#"ios-CFBundleVersion="1.0.1""#));
    assert!(!config.contains("cdn.example.com"));
    assert!(reporter.at(Level::Error).is_empty());
}

#[test]
fn test_scenario_b_release_build_writes_nothing() {
    let env = env_json(LOCAL_URL);
    let temp = project(CONFIG_XML, true, Some(&env));
    let reporter = RecordingReporter::new();
    let hook = LocalDevHook::with_xml_config(HookSettings::default(), &reporter);

    let outcome = hook.run(&context(temp.path(), &["ios", "--release", "--device"]));

    assert_eq!(outcome, Outcome::ReleaseBuild);
    assert_eq!(read_config(temp.path()), CONFIG_XML);
    assert_eq!(reporter.at(Level::Warn).len(), 1);
    assert!(reporter.at(Level::Error).is_empty());
}

#[test]
fn test_scenario_c_missing_env_file_writes_nothing() {
    let temp = project(CONFIG_XML, true, None);
    let reporter = RecordingReporter::new();
    let hook = LocalDevHook::with_xml_config(HookSettings::default(), &reporter);

    let outcome = hook.run(&context(temp.path(), &[]));

    assert_eq!(outcome, Outcome::EnvironmentUnavailable);
    assert_eq!(read_config(temp.path()), CONFIG_XML);
    let errors = reporter.at(Level::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains(".chcpenv"));
}

#[test]
fn test_plugin_missing_writes_nothing() {
    let env = env_json(LOCAL_URL);
    let temp = project(CONFIG_XML, false, Some(&env));
    let reporter = RecordingReporter::new();
    let hook = LocalDevHook::with_xml_config(HookSettings::default(), &reporter);

    assert_eq!(hook.run(&context(temp.path(), &[])), Outcome::PluginMissing);
    assert_eq!(read_config(temp.path()), CONFIG_XML);
}

#[test]
fn test_disabled_writes_nothing() {
    let disabled = CONFIG_XML.replace(r#"enabled="true""#, r#"enabled="false""#);
    let env = env_json(LOCAL_URL);
    let temp = project(&disabled, true, Some(&env));
    let reporter = RecordingReporter::new();
    let hook = LocalDevHook::with_xml_config(HookSettings::default(), &reporter);

    assert_eq!(hook.run(&context(temp.path(), &[])), Outcome::Disabled);
    assert_eq!(read_config(temp.path()), disabled);
    assert!(reporter.at(Level::Error).is_empty());
    assert!(reporter.at(Level::Warn).is_empty());
}

#[test]
fn test_missing_config_xml() {
    let temp = TempDir::new().unwrap();
    let reporter = RecordingReporter::new();
    let hook = LocalDevHook::with_xml_config(HookSettings::default(), &reporter);

    assert_eq!(
        hook.run(&context(temp.path(), &[])),
        Outcome::ConfigUnavailable
    );
    assert!(!temp.path().join("config.xml").exists());
}

#[test]
fn test_malformed_config_xml_is_reported() {
    let temp = project("<widget><chcp></widget>", true, Some(&env_json(LOCAL_URL)));
    let reporter = RecordingReporter::new();
    let hook = LocalDevHook::with_xml_config(HookSettings::default(), &reporter);

    assert_eq!(
        hook.run(&context(temp.path(), &[])),
        Outcome::ConfigUnavailable
    );
    assert_eq!(reporter.at(Level::Error).len(), 1);
}

#[test]
fn test_repeated_runs_keep_url_and_keep_bumping() {
    let env = env_json(LOCAL_URL);
    let temp = project(CONFIG_XML, true, Some(&env));
    let reporter = RecordingReporter::new();
    let hook = LocalDevHook::with_xml_config(HookSettings::default(), &reporter);
    let ctx = context(temp.path(), &[]);

    assert!(hook.run(&ctx).is_applied());
    let first = read_config(temp.path());
    assert!(hook.run(&ctx).is_applied());
    let second = read_config(temp.path());

    assert!(first.contains(&format!(r#"url="{LOCAL_URL}""#)));
    assert!(second.contains(&format!(r#"url="{LOCAL_URL}""#)));
    assert!(first.contains(r#"android-versionCode="10001""#));
    assert!(second.contains(r#"android-versionCode="10002""#));
    assert!(second.contains(r#"ios-CFBundleVersion="1.0.2""#));
}

#[test]
fn test_config_without_block_is_disabled() {
    // Without a <chcp> block the flag is off, so the hook must not touch the file
    let bare = "<widget id=\"com.example.app\" version=\"2.1.0\">\n    <name>Bare</name>\n</widget>\n";
    let temp = project(bare, true, Some(&env_json(LOCAL_URL)));
    let reporter = RecordingReporter::new();
    let hook = LocalDevHook::with_xml_config(HookSettings::default(), &reporter);

    assert_eq!(hook.run(&context(temp.path(), &[])), Outcome::Disabled);
    assert_eq!(read_config(temp.path()), bare);
}

#[test]
fn test_invalid_build_version_leaves_config_untouched() {
    let broken = CONFIG_XML.replace(
        r#"version="1.0.0""#,
        r#"version="1.0.0" android-versionCode="dev""#,
    );
    let temp = project(&broken, true, Some(&env_json(LOCAL_URL)));
    let reporter = RecordingReporter::new();
    let hook = LocalDevHook::with_xml_config(HookSettings::default(), &reporter);

    let outcome = hook.run(&context(temp.path(), &[]));

    assert_eq!(outcome, Outcome::VersionInvalid);
    assert_eq!(read_config(temp.path()), broken);
    let errors = reporter.at(Level::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("android-versionCode"));
}

#[test]
fn test_prerelease_version_is_fully_applied() {
    let beta = CONFIG_XML.replace(r#"version="1.0.0""#, r#"version="1.0.0-beta""#);
    let temp = project(&beta, true, Some(&env_json(LOCAL_URL)));
    let reporter = RecordingReporter::new();
    let hook = LocalDevHook::with_xml_config(HookSettings::default(), &reporter);

    let outcome = hook.run(&context(temp.path(), &[]));

    assert!(outcome.is_applied(), "unexpected outcome: {outcome:?}");
    let config = read_config(temp.path());
    assert!(config.contains(&format!(r#"<config-file url="{LOCAL_URL}"/>"#)));
    assert!(config.contains(r#"android-versionCode="10001""#));
    assert!(config.contains(r#"ios-CFBundleVersion="1.0.1""#));
}

#[test]
fn test_overflowing_version_code_leaves_config_untouched() {
    let huge = CONFIG_XML.replace(
        r#"version="1.0.0""#,
        r#"version="1.0.0" android-versionCode="18446744073709551615""#,
    );
    let temp = project(&huge, true, Some(&env_json(LOCAL_URL)));
    let reporter = RecordingReporter::new();
    let hook = LocalDevHook::with_xml_config(HookSettings::default(), &reporter);

    assert_eq!(hook.run(&context(temp.path(), &[])), Outcome::VersionInvalid);
    assert_eq!(read_config(temp.path()), huge);
}

#[test]
fn test_unrelated_chcp_content_survives_a_run() {
    let annotated = CONFIG_XML.replace(
        "    <chcp>\n",
        "    <chcp>\n        <!-- staging server -->\n        <native-interface>2</native-interface>\n",
    );
    let temp = project(&annotated, true, Some(&env_json(LOCAL_URL)));
    let reporter = RecordingReporter::new();
    let hook = LocalDevHook::with_xml_config(HookSettings::default(), &reporter);

    assert!(hook.run(&context(temp.path(), &[])).is_applied());

    let config = read_config(temp.path());
    assert!(config.contains("        <!-- staging server -->\n"));
    assert!(config.contains("        <native-interface>2</native-interface>\n"));
    assert!(config.contains(&format!(r#"<config-file url="{LOCAL_URL}"/>"#)));
}
