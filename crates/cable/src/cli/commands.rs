//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cable - AI-directed live narrative video
#[derive(Parser, Debug)]
#[command(name = "cable")]
#[command(about = "Tune into AI-directed narrative channels", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the available channels
    Themes {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Watch a channel with the local story engine and in-memory stream
    Watch {
        /// Channel id, as listed by `cable themes`
        #[arg(long)]
        theme: String,

        /// Cues to submit in order after tuning in
        #[arg(long = "cue")]
        cues: Vec<String>,

        /// How long to keep watching before stopping
        #[arg(long, default_value = "30")]
        seconds: u64,

        /// Configuration file layered over the defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Output format for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Human,
    /// JSON
    Json,
}
