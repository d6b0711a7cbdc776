//! CLI subcommand definitions

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Main CLI commands
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run an interactive study timer (default)
    Run {
        /// Study topic for the session (can be changed with `topic <text>`)
        #[arg(short, long)]
        topic: Option<String>,
    },
    /// Show logged study sessions
    Log(LogArgs),
    /// Copy the session log to another file
    Export {
        /// Destination path
        path: PathBuf,
    },
    /// Restore the session log from the newest backup
    Restore,
    /// List backup copies of the session log
    Backups {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct LogArgs {
    /// Filter from date (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long)]
    pub(crate) since: Option<String>,

    /// Filter until date (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long)]
    pub(crate) until: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub(crate) json: bool,
}

impl Commands {
    /// Commands whose stdout is machine-readable
    pub(crate) fn is_json(&self) -> bool {
        match self {
            Commands::Log(args) => args.json,
            Commands::Backups { json } => *json,
            _ => false,
        }
    }
}
