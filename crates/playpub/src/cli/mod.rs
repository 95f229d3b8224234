//! CLI definition and command handling

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use commands::{CheckCommand, PublishCommand};

/// playpub - publish Android apps and bundles to Google Play
#[derive(Debug, Parser)]
#[command(name = "playpub")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload artifacts, update the track and commit the edit
    Publish(PublishCommand),

    /// Validate inputs and preview the release without contacting Google Play
    Check(CheckCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Publish(ref cmd) => cmd.execute(&self),
            Commands::Check(ref cmd) => cmd.execute(&self),
        }
    }
}
