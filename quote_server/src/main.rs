//! Authoritative quote server.
//!
//! This binary owns the "server side" collection that clients reconcile against.
//! It loads the collection once at start-up, from a JSON file if one is given or
//! from the built-in server list otherwise, and answers every TCP connection with
//! the full collection as a JSON array before closing it.
//!
//! Concurrency:
//! - one thread per accepted connection, sharing a pre-encoded payload;
//! - a failing client is logged and does not affect the accept loop.
//!
//! The optional `--delay-ms` reproduces the latency of the mock server so clients can
//! observe a slow authoritative source.
#![warn(missing_docs)]
use crate::args::Args;
use crate::responder::QuoteResponder;
use clap::Parser;
use log::{error, info};
use quote_common::Quote;
use quote_common::QuoteError;
use quote_common::Result;
use std::fs;
use std::path::Path;
use std::time::Duration;

mod args;
mod responder;

/// Read the authoritative collection from a JSON array file.
fn load_quotes(path: &Path) -> Result<Vec<Quote>, QuoteError> {
    let raw = fs::read_to_string(path)?;
    let quotes: Vec<Quote> = serde_json::from_str(&raw)
        .map_err(|e| QuoteError::Format(format!("{}: {}", path.display(), e)))?;
    for (index, quote) in quotes.iter().enumerate() {
        Quote::new(&quote.text, &quote.category)
            .map_err(|e| QuoteError::Format(format!("{} element {}: {}", path.display(), index, e)))?;
    }
    Ok(quotes)
}

fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();

    let quotes = match &args.quotes {
        Some(path) => load_quotes(path).inspect_err(|e| error!("Cannot load quotes: {}", e))?,
        None => Quote::server_defaults(),
    };
    info!("Serving {} authoritative quotes", quotes.len());

    let responder = QuoteResponder::new(&args.bind, &quotes, Duration::from_millis(args.delay_ms))?;
    responder.serve()
}

fn init_logger() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_quotes_reads_array_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quotes.json");
        fs::write(&path, r#"[{"text":"A","category":"X"}]"#).unwrap();

        let quotes = load_quotes(&path).unwrap();

        assert_eq!(quotes, vec![Quote::new("A", "X").unwrap()]);
    }

    #[test]
    fn load_quotes_rejects_blank_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quotes.json");
        fs::write(&path, r#"[{"text":" ","category":"X"}]"#).unwrap();

        assert!(matches!(load_quotes(&path), Err(QuoteError::Format(_))));
    }

    #[test]
    fn load_quotes_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_quotes(&temp_dir.path().join("absent.json"));
        assert!(matches!(result, Err(QuoteError::Io(_))));
    }
}
