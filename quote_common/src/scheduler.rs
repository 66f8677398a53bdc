//! Periodic sync scheduling.
//!
//! `SyncScheduler::start` spawns a worker thread that runs one reconcile cycle right
//! away and then one per clock tick, publishing every `SyncOutcome` on a channel.
//! The worker multiplexes ticks and the stop signal with crossbeam `select!`; a
//! cycle that has started always runs to completion before the stop is observed.
//!
//! Time comes from a `Clock`, so tests can drive the cadence by hand with
//! `ManualClock` instead of sleeping.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, select, unbounded};
use log::{debug, error, info};

use crate::reconciler::{Reconciler, SyncOutcome};

/// Default time between two sync cycles.
pub const SYNC_INTERVAL: Duration = Duration::from_secs(30);

/// Source of periodic ticks.
pub trait Clock {
    /// Channel delivering one message per elapsed `interval`.
    fn ticker(&self, interval: Duration) -> Receiver<Instant>;
}

/// Wall-clock ticks backed by `crossbeam_channel::tick`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn ticker(&self, interval: Duration) -> Receiver<Instant> {
        crossbeam_channel::tick(interval)
    }
}

/// Clock that only ticks when told to.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    tickers: Arc<Mutex<Vec<Sender<Instant>>>>,
}

impl ManualClock {
    /// Create a clock with no tickers yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one tick to every live ticker. Returns how many received it.
    pub fn advance(&self) -> usize {
        let now = Instant::now();
        match self.tickers.lock() {
            Ok(mut tickers) => {
                tickers.retain(|tx| tx.send(now).is_ok());
                tickers.len()
            }
            Err(e) => {
                error!("Manual clock lock poisoned: {}", e);
                0
            }
        }
    }
}

impl Clock for ManualClock {
    fn ticker(&self, _interval: Duration) -> Receiver<Instant> {
        let (tx, rx) = unbounded();
        match self.tickers.lock() {
            Ok(mut tickers) => tickers.push(tx),
            Err(e) => error!("Manual clock lock poisoned: {}", e),
        }
        rx
    }
}

/// Entry point for starting the periodic sync worker.
pub struct SyncScheduler;

impl SyncScheduler {
    /// Start syncing `reconciler` every `interval` of `clock`.
    pub fn start(reconciler: Arc<Reconciler>, clock: &dyn Clock, interval: Duration) -> SyncHandle {
        let ticks = clock.ticker(interval);
        let (stop_tx, stop_rx) = unbounded::<()>();
        let (outcome_tx, outcome_rx) = unbounded::<SyncOutcome>();

        let worker = thread::spawn(move || {
            info!("Sync scheduler started, interval {:?}", interval);
            run_cycle(&reconciler, &outcome_tx);
            loop {
                select! {
                    recv(stop_rx) -> _ => break,
                    recv(ticks) -> tick => match tick {
                        Ok(_) => run_cycle(&reconciler, &outcome_tx),
                        Err(_) => {
                            debug!("Clock dropped, sync scheduler exiting");
                            break;
                        }
                    },
                }
            }
            info!("Sync scheduler stopped");
        });

        SyncHandle {
            stop_tx,
            outcomes: outcome_rx,
            worker: Some(worker),
        }
    }
}

fn run_cycle(reconciler: &Reconciler, outcome_tx: &Sender<SyncOutcome>) {
    let outcome = reconciler.reconcile();
    debug!("Sync cycle finished: {:?}", outcome);
    // Nobody listening is fine; the store has already been updated.
    let _ = outcome_tx.send(outcome);
}

/// Handle to a running scheduler. Dropping it stops the worker.
pub struct SyncHandle {
    stop_tx: Sender<()>,
    outcomes: Receiver<SyncOutcome>,
    worker: Option<JoinHandle<()>>,
}

impl SyncHandle {
    /// Outcomes of every cycle, in the order they ran.
    pub fn outcomes(&self) -> &Receiver<SyncOutcome> {
        &self.outcomes
    }

    /// Stop the worker and wait for an in-flight cycle to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Sync scheduler worker panicked");
            }
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_ticks_only_on_advance() {
        let clock = ManualClock::new();
        let ticks = clock.ticker(SYNC_INTERVAL);
        assert!(ticks.try_recv().is_err());

        assert_eq!(clock.advance(), 1);
        assert!(ticks.try_recv().is_ok());
        assert!(ticks.try_recv().is_err());
    }

    #[test]
    fn manual_clock_forgets_dropped_tickers() {
        let clock = ManualClock::new();
        drop(clock.ticker(SYNC_INTERVAL));
        assert_eq!(clock.advance(), 0);
    }

    #[test]
    fn system_clock_ticks() {
        let ticks = SystemClock.ticker(Duration::from_millis(5));
        assert!(ticks.recv_timeout(Duration::from_secs(1)).is_ok());
    }
}
