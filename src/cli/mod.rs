//! Command-line interface for jsonapi-admin.
//!
//! The binary exposes the library's offline operations so a configuration or
//! a captured server response can be checked without running the admin UI.
//!
//! # Commands
//!
//! - `validate` - Load and validate a configuration, print its collections
//! - `normalize` - Normalize a JSON:API document file into flat records
//! - `plan` - Show the backend request the client would issue for a collection
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Only log errors
//! - `--config <PATH>` - Configuration file (else `JSONAPI_ADMIN_CONFIG`, else
//!   `jsonapi-admin.toml`)
//!
//! Log output goes to stderr; stdout carries only command results, so
//! `jsonapi-admin normalize ... > records.json` stays machine-readable.
//! `RUST_LOG` overrides the level chosen by `--verbose`/`--quiet`.

mod normalize;
mod plan;
mod validate;

pub use normalize::NormalizeCommand;
pub use plan::PlanCommand;
pub use validate::ValidateCommand;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::{AdminConfig, ResolvedConfig};

/// Output format for command results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(
    name = "jsonapi-admin",
    about = "Normalize JSON:API documents and inspect admin collection configuration",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load and validate a configuration file.
    Validate(ValidateCommand),

    /// Normalize a JSON:API document into flat records.
    Normalize(NormalizeCommand),

    /// Show the request issued for a collection page or item.
    Plan(PlanCommand),
}

impl Cli {
    /// Run the parsed command.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.log_level());

        match self.command {
            Commands::Validate(cmd) => cmd.execute(self.config.as_deref()).await,
            Commands::Normalize(cmd) => cmd.execute(self.config.as_deref()).await,
            Commands::Plan(cmd) => cmd.execute(self.config.as_deref()).await,
        }
    }

    /// Log level implied by the verbosity flags.
    pub const fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}

/// Install the stderr log subscriber; `RUST_LOG` wins over `level`.
pub fn init_logging(level: &str) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load and resolve the configuration at `explicit`, or the default location.
pub(crate) async fn load_config(explicit: Option<&Path>) -> Result<ResolvedConfig> {
    let path = explicit.map_or_else(AdminConfig::default_path, Path::to_path_buf);
    ResolvedConfig::load(&path).await
}
