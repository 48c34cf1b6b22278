//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stowage - upload admission and age-based retention for user assets
#[derive(Parser, Debug)]
#[command(name = "stowage")]
#[command(about = "Upload admission and age-based retention for user assets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file to use instead of the user configuration files
    #[arg(short, long, global = true, env = "STOWAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Admit a file into a namespace
    Admit {
        /// Namespace to admit into
        #[arg(long, short)]
        namespace: String,

        /// Owner of the asset
        #[arg(long, short)]
        owner: String,

        /// Declared content type, e.g. image/png
        #[arg(long, short)]
        mime: String,

        /// File to admit
        file: PathBuf,
    },

    /// Run one retention sweep now
    Sweep {
        /// Only sweep this namespace
        #[arg(long, short)]
        namespace: Option<String>,
    },

    /// List the assets of a namespace
    List {
        /// Namespace to list
        #[arg(long, short)]
        namespace: String,
    },

    /// Run the retention sweepers until interrupted
    Serve,
}
