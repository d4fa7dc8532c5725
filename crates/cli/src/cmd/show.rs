//! Show command implementation
//!
//! Prints what the hook would work with: the `<chcp>` preferences, whether
//! the plugin is installed and what the environment side file says. Nothing
//! is modified.

use anyhow::{Context, Result};
use chcp_config::EnvironmentConfig;
use chcp_core::{BuildContext, PluginPreferences, PreferenceStore};
use chcp_engine::{XmlPreferenceStore, is_plugin_installed};
use clap::{Args, ValueEnum};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::{self, Write};

use crate::command::Command;
use crate::common::RuntimeContext;

const NOT_FOUND: &str = "not found";

/// Output format for `show`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned, colored text
    #[default]
    Simple,
    /// Pretty-printed JSON
    Json,
}

/// Display the local development state of the project
#[derive(Debug, Default, Args)]
pub struct ShowCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Simple)]
    pub format: OutputFormat,
}

/// Everything `show` reports
#[derive(Debug, Serialize)]
pub struct ShowData {
    /// Absolute project root
    pub project_root: String,
    /// State of the project configuration file
    pub config_xml: ConfigXmlInfo,
    /// Whether the plugin descriptor exists
    pub plugin_installed: bool,
    /// State of the environment side file
    pub env_file: EnvFileInfo,
}

/// State of `config.xml`
#[derive(Debug, Serialize)]
pub struct ConfigXmlInfo {
    /// Absolute path of the file
    pub path: String,
    /// Whether the file exists
    pub exists: bool,
    /// Value of the local development flag
    pub local_development_enabled: bool,
    /// The `<chcp>` preferences, empty without a file or block
    pub preferences: PluginPreferences,
}

/// State of `.chcpenv`
#[derive(Debug, Serialize)]
pub struct EnvFileInfo {
    /// Absolute path of the file
    pub path: String,
    /// The usable `config_url`, if any
    pub config_url: Option<String>,
    /// Why no `config_url` is available
    pub error: Option<String>,
}

/// Collect the current state without touching any file
///
/// # Errors
///
/// Returns an error if `config.xml` exists but cannot be read or parsed.
/// Problems with the environment side file are part of the result.
pub fn gather(context: &RuntimeContext) -> Result<ShowData> {
    let settings = &context.settings;
    let root = &context.project_root;
    let ctx = BuildContext::new(root.clone());

    let config_path = settings.config_xml_path(root);
    let preferences = XmlPreferenceStore::new(settings.clone())
        .read_options(&ctx)
        .with_context(|| format!("Failed to read {config_path}"))?;
    let exists = preferences.is_some();
    let preferences = preferences.unwrap_or_default();

    let env_path = settings.env_file_path(root);
    let (config_url, error) = match EnvironmentConfig::load(env_path.as_path()) {
        Ok(env) => match env.config_url() {
            Some(url) => (Some(url.to_string()), None),
            None => (None, Some("config_url is not set".to_string())),
        },
        Err(e) => (None, Some(e.to_string())),
    };

    Ok(ShowData {
        project_root: root.to_string(),
        config_xml: ConfigXmlInfo {
            path: config_path.to_string(),
            exists,
            local_development_enabled: preferences.local_development_enabled(),
            preferences,
        },
        plugin_installed: is_plugin_installed(settings, root),
        env_file: EnvFileInfo {
            path: env_path.to_string(),
            config_url,
            error,
        },
    })
}

/// Write `data` in the requested format
///
/// # Errors
///
/// Returns an error if writing fails or JSON serialization fails.
pub fn render(data: &ShowData, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, data)?;
            writeln!(out)?;
        }
        OutputFormat::Simple => render_simple(data, out)?,
    }
    Ok(())
}

fn render_simple(data: &ShowData, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{:<12}{}", "Project".bold(), data.project_root)?;

    let config = &data.config_xml;
    if config.exists {
        writeln!(out, "{:<12}{}", "Config".bold(), config.path)?;
        if config.preferences.is_empty() {
            writeln!(out, "  {}", "no <chcp> preferences".dimmed())?;
        }
        for (key, value) in config.preferences.iter() {
            writeln!(out, "  {key:<28}{value}")?;
        }
    } else {
        writeln!(out, "{:<12}{} ({})", "Config".bold(), config.path, NOT_FOUND.red())?;
    }

    let local_dev = if config.local_development_enabled {
        "enabled".green().to_string()
    } else {
        "disabled".dimmed().to_string()
    };
    writeln!(out, "{:<12}{local_dev}", "Local dev".bold())?;

    let plugin = if data.plugin_installed {
        "installed".green().to_string()
    } else {
        NOT_FOUND.red().to_string()
    };
    writeln!(out, "{:<12}{plugin}", "Plugin".bold())?;

    let env = &data.env_file;
    match (&env.config_url, &env.error) {
        (Some(url), _) => writeln!(out, "{:<12}{url}", "Dev server".bold())?,
        (None, Some(error)) => writeln!(out, "{:<12}{}", "Dev server".bold(), error.yellow())?,
        (None, None) => writeln!(out, "{:<12}{}", "Dev server".bold(), NOT_FOUND.yellow())?,
    }
    Ok(())
}

impl Command for ShowCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let data = gather(context)?;
        let stdout = io::stdout();
        let mut out = stdout.lock();
        render(&data, self.format, &mut out)
    }
}
