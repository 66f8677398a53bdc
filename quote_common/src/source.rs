//! Authoritative quote sources.
//!
//! A `QuoteSource` is whatever the reconciler treats as the server's current state.
//! `MockServer` simulates one in memory with a fixed network delay; real network
//! sources live with the binaries that know how to reach them.

use std::thread;
use std::time::Duration;

use log::debug;

use crate::quote::Quote;
use crate::result::Result;

/// Simulated network latency of the mock server.
pub const MOCK_DELAY: Duration = Duration::from_millis(500);

/// Provider of the authoritative quote collection.
pub trait QuoteSource: Send + Sync {
    /// Fetch the full authoritative collection. Blocks for the network round trip.
    fn fetch(&self) -> Result<Vec<Quote>>;
}

/// In-memory stand-in for the quote server.
#[derive(Debug, Clone)]
pub struct MockServer {
    quotes: Vec<Quote>,
    delay: Duration,
}

impl MockServer {
    /// Mock holding [`Quote::server_defaults`] with the standard delay.
    pub fn new() -> Self {
        Self::with_quotes(Quote::server_defaults())
    }

    /// Mock holding an arbitrary collection with the standard delay.
    pub fn with_quotes(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            delay: MOCK_DELAY,
        }
    }

    /// Override the simulated latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteSource for MockServer {
    fn fetch(&self) -> Result<Vec<Quote>> {
        thread::sleep(self.delay);
        debug!("Mock server returned {} quotes", self.quotes.len());
        Ok(self.quotes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn mock_returns_its_collection_after_delay() {
        let server = MockServer::new().with_delay(Duration::from_millis(20));
        let started = Instant::now();

        let quotes = server.fetch().unwrap();

        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(quotes, Quote::server_defaults());
    }
}
