//! Prepare command implementation
//!
//! Runs the local development hook for one build-preparation event. This is
//! what the Cordova `before_prepare` hook invokes.

use anyhow::Result;
use chcp_core::path::AbsPath;
use chcp_core::{BuildContext, Reporter};
use chcp_engine::{LocalDevHook, Outcome};
use clap::Parser;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::ui::ConsoleReporter;

/// Apply local development settings before a build
#[derive(Debug, Default, Parser)]
#[command(name = "prepare")]
pub struct PrepareCommand {
    /// Full command line of the build invocation
    #[arg(long, env = "CORDOVA_CMDLINE", value_name = "CMDLINE")]
    pub cmdline: Option<String>,

    /// Platforms being prepared (comma separated)
    #[arg(
        long,
        env = "CORDOVA_PLATFORMS",
        value_name = "PLATFORMS",
        value_delimiter = ','
    )]
    pub platforms: Vec<String>,

    /// Extra option tokens of the build invocation (after `--`)
    #[arg(last = true, value_name = "OPTIONS")]
    pub options: Vec<String>,
}

impl PrepareCommand {
    /// Arguments taken only from the environment Cordova sets for hooks
    pub fn from_env() -> Self {
        Self::try_parse_from(["prepare"]).unwrap_or_default()
    }

    /// Option tokens from the host command line followed by the trailing arguments
    pub fn option_tokens(&self) -> Vec<String> {
        let mut tokens = match self.cmdline.as_deref() {
            Some(cmdline) => shell_words::split(cmdline).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Unbalanced quoting in build command line");
                cmdline.split_whitespace().map(str::to_string).collect()
            }),
            None => Vec::new(),
        };
        tokens.extend(self.options.iter().cloned());
        tokens
    }

    /// Build the immutable context the hook runs against
    pub fn build_context(&self, project_root: AbsPath) -> BuildContext {
        let platforms = self
            .platforms
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty());
        BuildContext::new(project_root)
            .with_options(self.option_tokens())
            .with_platforms(platforms)
    }

    /// Run the hook with an explicit reporter
    pub fn run_with(&self, context: &RuntimeContext, reporter: &dyn Reporter) -> Outcome {
        let ctx = self.build_context(context.project_root.clone());
        tracing::debug!(
            options = ?ctx.options(),
            platforms = ?ctx.platforms(),
            "Build invocation"
        );

        let hook = LocalDevHook::with_xml_config(context.settings.clone(), reporter);
        let outcome = hook.run(&ctx);
        tracing::debug!(?outcome, "Hook finished");
        outcome
    }
}

impl Command for PrepareCommand {
    type Output = Outcome;

    fn execute(&self, context: &RuntimeContext) -> Result<Outcome> {
        Ok(self.run_with(context, &ConsoleReporter::stdout()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chcp_config::HookSettings;
    use chcp_engine::{Level, RecordingReporter};
    use std::fs;
    use tempfile::TempDir;

    fn command(cmdline: Option<&str>, options: &[&str]) -> PrepareCommand {
        PrepareCommand {
            cmdline: cmdline.map(str::to_string),
            platforms: Vec::new(),
            options: options.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    fn project(enabled: bool) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("config.xml"),
            format!(
                "<widget id=\"com.example\" version=\"0.1.0\">\n    <chcp>\n        <local-development enabled=\"{enabled}\"/>\n    </chcp>\n</widget>\n"
            ),
        )
        .unwrap();
        let plugin = temp.path().join("plugins/cordova-hot-code-push-plugin");
        fs::create_dir_all(&plugin).unwrap();
        fs::write(plugin.join("plugin.xml"), "<plugin/>").unwrap();
        fs::write(
            temp.path().join(".chcpenv"),
            r#"{"config_url":"http://10.0.0.2:8000/chcp.json"}"#,
        )
        .unwrap();
        temp
    }

    fn runtime(temp: &TempDir) -> RuntimeContext {
        RuntimeContext::new(
            AbsPath::new(temp.path().to_path_buf()).unwrap(),
            HookSettings::default(),
        )
    }

    #[test]
    fn test_option_tokens_split_cmdline_with_quotes() {
        let cmd = command(
            Some("node /usr/bin/cordova build android --buildConfig \"my build.json\" --release"),
            &["--device"],
        );

        assert_eq!(
            cmd.option_tokens(),
            vec![
                "node",
                "/usr/bin/cordova",
                "build",
                "android",
                "--buildConfig",
                "my build.json",
                "--release",
                "--device",
            ]
        );
    }

    #[test]
    fn test_option_tokens_fall_back_on_bad_quoting() {
        let cmd = command(Some("cordova run \"ios --release"), &[]);
        assert_eq!(cmd.option_tokens(), vec!["cordova", "run", "\"ios", "--release"]);
    }

    #[test]
    fn test_build_context_detects_release_from_cmdline() {
        let cmd = command(Some("cordova build ios --release"), &[]);
        let ctx = cmd.build_context(AbsPath::new("/work/app".into()).unwrap());
        assert!(ctx.is_release());
    }

    #[test]
    fn test_build_context_platforms() {
        let cmd = PrepareCommand {
            platforms: vec!["android".into(), " ios ".into(), String::new()],
            ..PrepareCommand::default()
        };
        let ctx = cmd.build_context(AbsPath::new("/work/app".into()).unwrap());
        assert_eq!(ctx.platforms(), ["android", "ios"]);
    }

    #[test]
    fn test_parse_trailing_options() {
        let cmd = PrepareCommand::try_parse_from([
            "prepare",
            "--cmdline",
            "cordova build",
            "--platforms",
            "android,ios",
            "--",
            "--release",
        ])
        .unwrap();

        assert_eq!(cmd.cmdline.as_deref(), Some("cordova build"));
        assert_eq!(cmd.platforms, ["android", "ios"]);
        assert_eq!(cmd.options, ["--release"]);
    }

    #[test]
    fn test_run_with_applies_local_settings() {
        let temp = project(true);
        let reporter = RecordingReporter::new();

        let outcome = command(Some("cordova build android"), &[]).run_with(&runtime(&temp), &reporter);

        assert!(outcome.is_applied());
        let config = fs::read_to_string(temp.path().join("config.xml")).unwrap();
        assert!(config.contains(r#"<config-file url="http://10.0.0.2:8000/chcp.json"/>"#));
        assert!(config.contains(r#"android-versionCode="101""#));
        assert_eq!(reporter.at(Level::Header).len(), 1);
    }

    #[test]
    fn test_run_with_release_writes_nothing() {
        let temp = project(true);
        let before = fs::read_to_string(temp.path().join("config.xml")).unwrap();
        let reporter = RecordingReporter::new();

        let outcome = command(None, &["--release"]).run_with(&runtime(&temp), &reporter);

        assert_eq!(outcome, Outcome::ReleaseBuild);
        let after = fs::read_to_string(temp.path().join("config.xml")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_run_with_disabled_is_silent() {
        let temp = project(false);
        let reporter = RecordingReporter::new();

        let outcome = command(None, &[]).run_with(&runtime(&temp), &reporter);

        assert_eq!(outcome, Outcome::Disabled);
        assert!(reporter.at(Level::Warn).is_empty());
        assert!(reporter.at(Level::Error).is_empty());
    }
}
