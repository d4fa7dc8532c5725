//! chcp-local-dev CLI library
//!
//! Argument parsing and command dispatch, kept in a library so the commands
//! can be tested without spawning the binary.

pub mod cmd;
pub mod command;
pub mod common;
pub mod ui;

use anyhow::Result;
use chcp_config::HookSettings;
use chcp_core::Reporter;
use chcp_engine::HEADER;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cmd::prepare::PrepareCommand;
use cmd::show::ShowCommand;
use command::Command;
use common::RuntimeContext;
use ui::ConsoleReporter;

/// Point Cordova hot code push at a local development server
#[derive(Parser)]
#[command(name = "chcp-local-dev")]
#[command(about = "Point Cordova hot code push at a local development server")]
#[command(version)]
#[command(long_about = "Point Cordova hot code push at a local development server

Runs as a before_prepare hook. When the hot-code-push plugin is installed,
the build is not a release build and local development is enabled in the
<chcp> block of config.xml, the config-file URL is replaced with the one
from .chcpenv and the native build version is increased.

Without a subcommand, prepare is run with the arguments Cordova provides
through CORDOVA_CMDLINE and CORDOVA_PLATFORMS.")]
pub struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, env = "CHCP_PROJECT_ROOT", value_name = "DIR", global = true)]
    pub project_root: Option<PathBuf>,

    /// Project root as passed positionally by Cordova to script hooks
    #[arg(value_name = "PROJECT_ROOT", hide = true)]
    pub hook_project_root: Option<PathBuf>,

    /// Environment file, relative to the project root
    #[arg(long, env = "CHCP_ENV_FILE", value_name = "FILE", global = true)]
    pub env_file: Option<String>,

    /// Project configuration file, relative to the project root
    #[arg(long, env = "CHCP_CONFIG_XML", value_name = "FILE", global = true)]
    pub config_xml: Option<String>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "CHCP_LOG_FILE", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Apply local development settings before a build (always exits 0)
    Prepare(PrepareCommand),

    /// Show preferences, plugin presence and the environment file
    Show(ShowCommand),
}

impl Cli {
    /// File locations with command line overrides applied
    pub fn settings(&self) -> HookSettings {
        let mut settings = HookSettings::default();
        if let Some(env_file) = &self.env_file {
            settings.env_file.clone_from(env_file);
        }
        if let Some(config_xml) = &self.config_xml {
            settings.config_xml.clone_from(config_xml);
        }
        settings
    }

    /// Resolve the runtime context for this invocation
    ///
    /// # Errors
    ///
    /// Returns an error if the project root cannot be resolved.
    pub fn runtime_context(&self) -> Result<RuntimeContext> {
        let root = self
            .project_root
            .as_deref()
            .or(self.hook_project_root.as_deref());
        RuntimeContext::resolve(root, self.settings())
    }
}

/// Main entry point for the CLI logic
///
/// # Errors
///
/// Returns an error if `show` fails. `prepare` only reports its problems and
/// always returns `Ok` so the host build goes on.
pub fn run(cli: Cli) -> Result<()> {
    if let Err(e) = chcp_config::logging::init(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("    Logging disabled: {e}");
    }

    let context = cli.runtime_context();
    match cli.command {
        Some(Commands::Show(show)) => show.execute(&context?),
        Some(Commands::Prepare(prepare)) => {
            run_prepare(&prepare, context);
            Ok(())
        }
        None => {
            run_prepare(&PrepareCommand::from_env(), context);
            Ok(())
        }
    }
}

fn run_prepare(prepare: &PrepareCommand, context: Result<RuntimeContext>) {
    match context {
        Ok(context) => {
            // Infallible by construction; the outcome is already reported
            let _ = prepare.execute(&context);
        }
        Err(e) => {
            tracing::error!(error = %e, "Cannot resolve project");
            let reporter = ConsoleReporter::stdout();
            reporter.header(HEADER);
            reporter.error(&format!("{e:#}"));
        }
    }
}
