//! # Vitrine CLI
//!
//! Command-line interface for the Vitrine image gallery.
//!
//! ## Commands
//!
//! - `vitrine view` - Browse the gallery interactively in the terminal
//! - `vitrine query <pattern>` - Search image names from the command line
//! - `vitrine status` - Show gallery statistics
//!
//! ## Example Usage
//!
//! ```bash
//! # Interactive gallery over a manifest
//! vitrine view -m gallery.json
//!
//! # One-shot search
//! vitrine query cat -m gallery.json
//! ```

mod app;
mod commands;
mod surface;
mod tui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Vitrine - searchable lazy-loading image gallery
#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the gallery interactively
    #[command(alias = "i")]
    View {
        /// Path to the gallery manifest (overrides the configured one)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// Search image names for a substring
    Query {
        /// Substring to match (case-insensitive, any position)
        pattern: String,

        /// Path to the gallery manifest (overrides the configured one)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Maximum number of results to show
        #[arg(short, long, default_value = "100")]
        limit: usize,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Show gallery statistics
    Status {
        /// Path to the gallery manifest (overrides the configured one)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },
}

#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => vitrine_core::Config::load_from(path)?,
        None => vitrine_core::Config::load()?,
    };

    // Execute command
    match cli.command {
        Commands::View { manifest } => tui::run(config, manifest),
        Commands::Query {
            pattern,
            manifest,
            limit,
            output,
        } => commands::query::run(config, manifest, &pattern, limit, output),
        Commands::Status { manifest } => commands::status::run(config, manifest),
    }
}
