//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Undoable - run multi-step file system plans with rollback
#[derive(Parser, Debug)]
#[command(name = "undoable")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: <config dir>/undoable/config.toml)
    #[arg(short, long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a plan file against a directory
    Run {
        /// Path to the plan file (.json or .toml)
        #[arg(value_name = "PLAN_FILE")]
        plan_file: PathBuf,

        /// Root directory the plan paths are relative to
        #[arg(short, long, value_name = "ROOT")]
        root: PathBuf,

        /// Continue with the remaining actions after a failure
        #[arg(long)]
        gracefully: bool,

        /// Leave completed actions in place when the run fails
        #[arg(long)]
        keep_on_failure: bool,
    },

    /// Validate a plan file and list its actions
    Check {
        /// Path to the plan file (.json or .toml)
        #[arg(value_name = "PLAN_FILE")]
        plan_file: PathBuf,
    },

    /// List trash entries kept for rollback
    Trash {
        /// Root directory
        #[arg(short, long, value_name = "ROOT")]
        root: PathBuf,
    },
}
