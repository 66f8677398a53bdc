//! Command-line arguments for the Quote Client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory holding the persisted quotes and the last selected filter.
    #[clap(long, default_value = ".quotes")]
    pub data_dir: PathBuf,

    /// Quote server address ("ip:port"). The built-in mock server is used when omitted.
    #[clap(long)]
    pub server: Option<String>,

    /// What to do.
    #[command(subcommand)]
    pub command: Action,
}

/// Client actions.
#[derive(Debug, Subcommand)]
pub enum Action {
    /// Print a random quote, optionally from one category ("all" for every category).
    Show {
        /// Category to pick from; defaults to the last selected filter.
        #[clap(long)]
        category: Option<String>,
    },
    /// Print quotes in a category and remember it as the selected filter.
    List {
        /// Category to list; defaults to the last selected filter.
        #[clap(long)]
        category: Option<String>,
    },
    /// Print the known categories.
    Categories,
    /// Add a single quote.
    Add {
        /// Quote text.
        #[clap(long)]
        text: String,
        /// Quote category.
        #[clap(long)]
        category: String,
    },
    /// Import quotes from a JSON file holding an array of quotes.
    Import {
        /// Path to the JSON file.
        path: PathBuf,
    },
    /// Export all quotes as quotes.json.
    Export {
        /// Directory to write quotes.json into.
        #[clap(long, default_value = ".")]
        out: PathBuf,
    },
    /// Run one sync cycle with the server.
    Sync,
    /// Keep syncing periodically until Ctrl+C.
    Watch {
        /// Seconds between two sync cycles.
        #[clap(long, default_value_t = 30)]
        interval_secs: u64,
    },
}
