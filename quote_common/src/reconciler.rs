//! One sync cycle between the local store and the authoritative source.
//!
//! A cycle fetches the authoritative collection without holding the store lock,
//! then merges against whatever the store holds at that moment, so quotes added
//! during the fetch are not lost. Only one cycle runs at a time; a call that finds
//! another cycle in flight returns [`SyncOutcome::Skipped`] without fetching.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, error, info};
use strum_macros::Display;

use crate::merge::merge;
use crate::result::Result;
use crate::source::QuoteSource;
use crate::store::QuoteStore;

/// Result of a single reconcile cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The merge changed the local collection, which was replaced and persisted.
    Synced {
        /// Size of the collection after the merge.
        total: usize,
    },
    /// The merge produced exactly the local collection. Nothing is written unless
    /// an earlier cycle left the collection unsaved.
    Unchanged,
    /// Another cycle was already running.
    Skipped,
    /// Fetching or persisting failed; the message says why.
    Failed(String),
}

impl SyncOutcome {
    /// User-facing notification for this outcome, if it deserves one.
    pub fn notification(&self) -> Option<Notification> {
        match self {
            SyncOutcome::Synced { .. } => Some(Notification {
                kind: NotificationKind::Synced,
                message: "Quotes have been synced with the server.".to_string(),
            }),
            SyncOutcome::Failed(_) => Some(Notification {
                kind: NotificationKind::Error,
                message: "Error syncing with the server.".to_string(),
            }),
            SyncOutcome::Unchanged | SyncOutcome::Skipped => None,
        }
    }
}

/// Kind of user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    /// Local quotes were updated from the server.
    Synced,
    /// The server could not be synced with.
    Error,
}

/// Message shown to the user after a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// What happened.
    pub kind: NotificationKind,
    /// Human-readable text.
    pub message: String,
}

/// Clears the in-flight flag when a cycle ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Merges the shared store with an authoritative source.
pub struct Reconciler {
    store: Arc<Mutex<QuoteStore>>,
    source: Arc<dyn QuoteSource>,
    in_flight: AtomicBool,
}

impl Reconciler {
    /// Create a reconciler for `store` backed by `source`.
    pub fn new(store: Arc<Mutex<QuoteStore>>, source: Arc<dyn QuoteSource>) -> Self {
        Self {
            store,
            source,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Run one cycle. Never panics on fetch or storage errors; they are reported
    /// as [`SyncOutcome::Failed`].
    pub fn reconcile(&self) -> SyncOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Sync cycle already in flight, skipping");
            return SyncOutcome::Skipped;
        }
        let _guard = InFlight(&self.in_flight);

        match self.run_cycle() {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error syncing with server: {}", e);
                SyncOutcome::Failed(e.to_string())
            }
        }
    }

    fn run_cycle(&self) -> Result<SyncOutcome> {
        let authoritative = self.source.fetch()?;
        debug!("Fetched {} authoritative quotes", authoritative.len());

        let mut store = self.store.lock()?;
        let merged = merge(store.quotes(), &authoritative);
        if merged.as_slice() == store.quotes() {
            if store.is_dirty() {
                info!("Retrying write of quotes left unsaved by an earlier cycle");
                store.save()?;
            }
            debug!("Local quotes already up to date");
            return Ok(SyncOutcome::Unchanged);
        }

        let total = merged.len();
        store.replace(merged)?;
        info!("Quotes synced with server, {} total", total);
        Ok(SyncOutcome::Synced { total })
    }
}
