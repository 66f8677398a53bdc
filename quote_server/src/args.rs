//! Command-line arguments for the quote server.
use std::path::PathBuf;

use clap::Parser;
use quote_common::net::{COMMAND_PORT, addr};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address to accept connections on.
    #[clap(long, default_value_t = addr("0.0.0.0", COMMAND_PORT))]
    pub bind: String,

    /// JSON file with the authoritative quotes. The built-in server list is used
    /// when omitted.
    #[clap(long)]
    pub quotes: Option<PathBuf>,

    /// Artificial latency added before every response, in milliseconds.
    #[clap(long, default_value_t = 0)]
    pub delay_ms: u64,
}
