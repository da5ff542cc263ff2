//! Command-line surface.
//!
//! # Responsibility
//! - Parse flags and environment into a store config and a single event.
//! - Keep argument handling separate from rendering and execution.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "simplenote",
    version,
    about = "Tiny persistent notepad",
    infer_subcommands = true
)]
pub struct Cli {
    /// Database file holding the note key-value store.
    #[arg(
        long,
        global = true,
        env = "SIMPLENOTE_DB",
        value_name = "PATH",
        default_value = "simplenote.sqlite3"
    )]
    pub db: PathBuf,

    /// Key namespace prefix (default: simplenote_).
    #[arg(long, global = true, env = "SIMPLENOTE_PREFIX", value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Storage quota in characters; `0` or `none` disables it.
    #[arg(
        long,
        global = true,
        env = "SIMPLENOTE_QUOTA_CHARS",
        value_name = "CHARS"
    )]
    pub quota_chars: Option<String>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true, env = "SIMPLENOTE_LOG_LEVEL", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files; logging stays off when unset.
    #[arg(long, global = true, env = "SIMPLENOTE_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Machine-readable JSON output.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the sidebar.
    #[command(alias = "ls")]
    List,
    /// Print the active note.
    Show,
    /// Create a new note and make it active.
    #[command(alias = "new")]
    Add,
    /// Replace the active note's text (reads stdin when TEXT is omitted).
    Edit { text: Option<String> },
    /// Make a note from the sidebar active.
    Select { id: String },
    /// Delete the active note.
    #[command(alias = "rm")]
    Delete,
    /// Delete every note.
    DeleteAll {
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Print the effective store configuration.
    Config,
}

pub fn parse() -> Cli {
    Cli::parse()
}
