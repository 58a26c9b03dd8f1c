//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bookshop")]
#[command(about = "Look up book sales by title or publisher", long_about = None)]
pub(crate) struct Cli {
    /// SQLite database file (overrides $BOOKSHOP_DATABASE and the settings file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Seconds to wait on a locked database before giving up
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for commands that load seed data.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct SeedArgs {
    /// Seed JSON file (overrides $BOOKSHOP_SEED_FILE and the settings file)
    #[arg(long)]
    pub seed_file: Option<PathBuf>,

    /// Drop and recreate all tables before loading (destroys existing data)
    #[arg(long)]
    pub reset: bool,

    /// Confirm a destructive --reset
    #[arg(long, requires = "reset")]
    pub confirm: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create the store tables if they don't exist
    Init,

    /// Drop and recreate all store tables (destroys existing data)
    Reset {
        /// Actually perform the reset
        #[arg(long)]
        confirm: bool,
    },

    /// Load seed data into the store in a single transaction
    Seed {
        #[command(flatten)]
        seed: SeedArgs,
    },

    /// List sales by publisher id or book title fragment
    Lookup {
        /// Publisher id (positive integer) or part of a book title; prompts if omitted
        term: Option<String>,

        /// Don't print the match count line
        #[arg(long)]
        no_count: bool,
    },

    /// Seed an empty store (or reset it), then prompt for a lookup
    Run {
        #[command(flatten)]
        seed: SeedArgs,
    },

    /// Show row counts and foreign-key integrity
    Stats,

    /// Show the resolved configuration and where each value came from
    Config,
}
