//! Quote Client — a command-line front end for the local quote store. It shows random
//! quotes, lists and filters them by category, adds and imports new ones, exports the
//! collection to `quotes.json`, and reconciles it with the authoritative quote server,
//! either once (`sync`) or periodically (`watch`).
//!
//! Usage example (CLI):
//! ```bash
//! quote_client --data-dir ./.quotes add --text "Stay hungry." --category Life
//! quote_client --server 127.0.0.1:8080 watch --interval-secs 30
//! ```
//!
//! Without `--server` the client syncs against the built-in mock server.
#![warn(missing_docs)]
mod args;
mod tcp_source;

use crate::args::{Action, Args};
use crate::tcp_source::TcpQuoteSource;
use clap::Parser;
use crossbeam_channel::{Receiver, bounded, select};
use log::{error, info, warn};
use quote_common::scheduler::{SyncScheduler, SystemClock};
use quote_common::source::{MockServer, QuoteSource};
use quote_common::storage::{FileStorage, MemoryStorage};
use quote_common::{CategoryFilter, NotificationKind, QuoteError, QuoteStore, Reconciler, Result, SyncOutcome};
use std::fs;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn main() {
    init_logger();
    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), QuoteError> {
    let durable = FileStorage::open(&args.data_dir)?;
    let store = QuoteStore::load(Box::new(durable), Box::new(MemoryStorage::new()));
    let store = Arc::new(Mutex::new(store));

    match args.command {
        Action::Show { category } => {
            let mut store = store.lock()?;
            let filter = resolve_filter(&store, category.as_deref());
            match store.random_quote(&filter)? {
                Some(quote) => println!("{}", quote),
                None => println!("No quotes in category '{}'.", filter),
            }
        }
        Action::List { category } => {
            let mut store = store.lock()?;
            let filter = resolve_filter(&store, category.as_deref());
            if let Err(e) = store.set_filter(&filter) {
                warn!("Could not remember filter: {}", e);
            }
            for quote in store.filtered(&filter) {
                println!("{}", quote);
            }
        }
        Action::Categories => {
            for category in store.lock()?.categories() {
                println!("{}", category);
            }
        }
        Action::Add { text, category } => {
            let mut store = store.lock()?;
            let quote = store.add(&text, &category)?;
            println!("Quote added: {}", quote);
        }
        Action::Import { path } => {
            let raw = fs::read_to_string(&path)?;
            let count = store.lock()?.import_file(&raw)?;
            println!("Imported {} quotes.", count);
        }
        Action::Export { out } => {
            let path = store.lock()?.export_to(&out)?;
            println!("Quotes exported to {}", path.display());
        }
        Action::Sync => {
            let reconciler = Reconciler::new(store, build_source(args.server.as_deref()));
            let outcome = reconciler.reconcile();
            notify(&outcome);
            if let SyncOutcome::Failed(reason) = outcome {
                return Err(QuoteError::Fetch(reason));
            }
        }
        Action::Watch { interval_secs } => {
            let reconciler = Arc::new(Reconciler::new(store, build_source(args.server.as_deref())));
            watch(reconciler, Duration::from_secs(interval_secs.max(1)))?;
        }
    }
    Ok(())
}

/// Explicit category from the command line, or the remembered one.
fn resolve_filter(store: &QuoteStore, category: Option<&str>) -> CategoryFilter {
    match category {
        Some(raw) => raw.parse().unwrap_or_default(),
        None => store.saved_filter(),
    }
}

fn build_source(server: Option<&str>) -> Arc<dyn QuoteSource> {
    match server {
        Some(addr) => {
            info!("Syncing against quote server {}", addr);
            Arc::new(TcpQuoteSource::new(addr))
        }
        None => {
            info!("Syncing against the built-in mock server");
            Arc::new(MockServer::new())
        }
    }
}

/// Runs the periodic sync until Ctrl+C, reporting every notification.
fn watch(reconciler: Arc<Reconciler>, interval: Duration) -> Result<(), QuoteError> {
    let shutdown_rx = install_shutdown_handler()?;
    let handle = SyncScheduler::start(reconciler, &SystemClock, interval);
    info!("Watching for server changes every {:?}. Press Ctrl+C to exit.", interval);

    loop {
        select! {
            recv(shutdown_rx) -> _ => break,
            recv(handle.outcomes()) -> outcome => match outcome {
                Ok(outcome) => notify(&outcome),
                Err(_) => break,
            },
        }
    }
    handle.stop();
    Ok(())
}

/// Channel that fires once when Ctrl+C is pressed.
fn install_shutdown_handler() -> Result<Receiver<()>, QuoteError> {
    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Stopping sync...");
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| QuoteError::Io(io::Error::other(e)))?;
    Ok(shutdown_rx)
}

fn notify(outcome: &SyncOutcome) {
    match outcome.notification() {
        Some(note) if note.kind == NotificationKind::Error => {
            error!("[{}] {}", note.kind, note.message)
        }
        Some(note) => info!("[{}] {}", note.kind, note.message),
        None => info!("{}", quiet_status(outcome)),
    }
}

/// Status line for outcomes that carry no notification.
fn quiet_status(outcome: &SyncOutcome) -> &'static str {
    match outcome {
        SyncOutcome::Skipped => "A sync is already in progress, skipped this one.",
        _ => "Quotes are already up to date.",
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
