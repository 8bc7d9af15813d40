//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chameleon micro-survey tap
#[derive(Parser, Debug)]
#[command(name = "tap-chameleon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON (takes precedence over --config)
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// State file (JSON), read at start and written at checkpoints
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Inline state JSON (takes precedence over --state)
    #[arg(long, global = true)]
    pub state_json: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the catalog of available streams
    Discover,

    /// Read data from streams
    Read {
        /// Streams to sync (comma-separated, empty = default selection)
        #[arg(long, value_delimiter = ',')]
        streams: Vec<String>,

        /// Abort the whole run on the first failed stream
        #[arg(long)]
        fail_fast: bool,
    },
}
