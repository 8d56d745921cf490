//! Command-line definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(
    name = "taskboard",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate and inspect task-board recommendations stored in SQLite"
)]
pub struct Cli {
    /// SQLite database file; created and migrated on first use.
    #[arg(global = true, long, env = "TASKBOARD_DB", default_value = "taskboard.sqlite3")]
    pub db: PathBuf,

    /// trace|debug|info|warn|error; defaults to debug in debug builds, info otherwise.
    #[arg(global = true, long, env = "TASKBOARD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotated log files; logs go to stderr when unset.
    #[arg(global = true, long, env = "TASKBOARD_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the core library version.
    Version,

    /// Seed a demo board and print its id.
    Demo {
        /// Owner of the demo board; random when omitted.
        #[arg(long)]
        owner: Option<Uuid>,
    },

    /// Show recommendations, generating them when none are stored.
    Recommend {
        board: Uuid,
        /// Enforce that this user owns or is a member of the board.
        #[arg(long)]
        user: Option<Uuid>,
    },

    /// Regenerate recommendations and show the new set.
    Refresh {
        board: Uuid,
        /// Enforce that this user owns or is a member of the board.
        #[arg(long)]
        user: Option<Uuid>,
    },

    /// Show stored recommendations without generating.
    List { board: Uuid },
}
