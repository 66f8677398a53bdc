//! The quote store: the in-memory collection plus its persistence.
//!
//! `QuoteStore` owns the ordered quote collection together with two storages:
//! a durable one (the collection and the last filter) and a session one (the last
//! displayed quote). Every successful mutation re-persists the full collection.
//!
//! Failure policy:
//! - loading never fails; a missing or unreadable snapshot falls back to
//!   [`Quote::defaults`];
//! - validation and format errors leave the collection untouched;
//! - storage write errors are returned to the caller, while the in-memory
//!   collection keeps the new state.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rand::Rng;
use serde_json::Value;

use crate::error::QuoteError;
use crate::quote::{CategoryFilter, Quote};
use crate::result::Result;
use crate::storage::{KeyValueStorage, LAST_FILTER_KEY, LAST_QUOTE_KEY, QUOTES_KEY};

/// File name used for exported collections.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Owner of the quote collection and its storages.
pub struct QuoteStore {
    quotes: Vec<Quote>,
    durable: Box<dyn KeyValueStorage>,
    session: Box<dyn KeyValueStorage>,
    /// Set while the last attempt to persist the collection failed.
    dirty: bool,
}

impl QuoteStore {
    /// Load the persisted collection, or fall back to the built-in defaults.
    pub fn load(durable: Box<dyn KeyValueStorage>, session: Box<dyn KeyValueStorage>) -> Self {
        let quotes = match durable.get(QUOTES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Quote>>(&raw) {
                Ok(quotes) => quotes,
                Err(e) => {
                    warn!("Persisted quotes are unreadable, using defaults: {}", e);
                    Quote::defaults()
                }
            },
            Ok(None) => Quote::defaults(),
            Err(e) => {
                warn!("Failed to read persisted quotes, using defaults: {}", e);
                Quote::defaults()
            }
        };
        info!("Quote store loaded with {} quotes", quotes.len());
        Self {
            quotes,
            durable,
            session,
            dirty: false,
        }
    }

    /// Current collection, in display order.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Write the full collection to durable storage.
    ///
    /// A failed write marks the store dirty until a later save succeeds.
    pub fn save(&mut self) -> Result<()> {
        self.dirty = true;
        let json = serde_json::to_string(&self.quotes)?;
        self.durable.set(QUOTES_KEY, &json)?;
        self.dirty = false;
        Ok(())
    }

    /// Whether memory is ahead of durable storage.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Validate and append a single quote, then persist.
    pub fn add(&mut self, text: &str, category: &str) -> Result<&Quote> {
        let quote = Quote::new(text, category)?;
        info!("Adding quote in category '{}'", quote.category);
        self.quotes.push(quote);
        self.save()?;
        Ok(&self.quotes[self.quotes.len() - 1])
    }

    /// Append every quote of a decoded JSON array, then persist.
    ///
    /// The value must be an array whose elements all decode to valid quotes;
    /// otherwise nothing is appended. Returns the number of imported quotes.
    pub fn import_many(&mut self, candidate: Value) -> Result<usize> {
        let Value::Array(items) = candidate else {
            return Err(QuoteError::Format(
                "expected a JSON array of quotes".to_string(),
            ));
        };

        let mut imported = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let raw: Quote = serde_json::from_value(item)
                .map_err(|e| QuoteError::Format(format!("element {index}: {e}")))?;
            let quote = Quote::new(&raw.text, &raw.category)
                .map_err(|e| QuoteError::Format(format!("element {index}: {e}")))?;
            imported.push(quote);
        }

        let count = imported.len();
        self.quotes.extend(imported);
        info!("Imported {} quotes", count);
        self.save()?;
        Ok(count)
    }

    /// Parse raw file contents as JSON and import them.
    pub fn import_file(&mut self, raw: &str) -> Result<usize> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| QuoteError::Format(format!("cannot parse JSON file: {e}")))?;
        self.import_many(value)
    }

    /// Pretty-printed JSON of the whole collection.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.quotes)?)
    }

    /// Write the pretty-printed collection to `dir/quotes.json`.
    pub fn export_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(EXPORT_FILE_NAME);
        fs::write(&path, self.export_json()?)?;
        info!("Exported {} quotes to {}", self.quotes.len(), path.display());
        Ok(path)
    }

    /// Replace the collection wholesale and persist it.
    ///
    /// The new collection stays in memory even if persisting fails.
    pub fn replace(&mut self, quotes: Vec<Quote>) -> Result<()> {
        self.quotes = quotes;
        self.save()
    }

    /// Sorted, de-duplicated list of categories.
    pub fn categories(&self) -> Vec<String> {
        self.quotes
            .iter()
            .map(|q| q.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Quotes passing `filter`, in collection order.
    pub fn filtered(&self, filter: &CategoryFilter) -> Vec<&Quote> {
        self.quotes.iter().filter(|q| filter.matches(q)).collect()
    }

    /// Remember the selected filter in durable storage.
    pub fn set_filter(&mut self, filter: &CategoryFilter) -> Result<()> {
        self.durable.set(LAST_FILTER_KEY, &filter.to_string())
    }

    /// Last remembered filter, `All` if none was saved or it cannot be read.
    pub fn saved_filter(&self) -> CategoryFilter {
        match self.durable.get(LAST_FILTER_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_default(),
            Ok(None) => CategoryFilter::All,
            Err(e) => {
                warn!("Failed to read last filter: {}", e);
                CategoryFilter::All
            }
        }
    }

    /// Pick a random quote among those passing `filter` and remember it in the
    /// session storage. `None` when no quote matches.
    pub fn random_quote(&mut self, filter: &CategoryFilter) -> Result<Option<Quote>> {
        let candidates = self.filtered(filter);
        if candidates.is_empty() {
            return Ok(None);
        }
        let index = rand::rng().random_range(0..candidates.len());
        let quote = candidates[index].clone();
        self.session.set(LAST_QUOTE_KEY, &quote.to_json_string()?)?;
        Ok(Some(quote))
    }
}
