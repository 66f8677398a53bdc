//! Error types shared between the library, the client and the server.
//!
//! The `QuoteError` enum unifies the failure cases of the quote store, the
//! reconciler and the binaries so every crate can propagate a single error type.
//! None of them is fatal: the store stays usable after any single failure.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by client, server and library.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// A quote field was empty after trimming.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Imported content was not a JSON array of quotes or could not be parsed.
    #[error("Format error: {0}")]
    Format(String),

    /// The authoritative source could not be reached or returned garbage.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Reading or writing the key-value storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    Lock(String),
}

impl<T> From<PoisonError<T>> for QuoteError {
    fn from(err: PoisonError<T>) -> Self {
        QuoteError::Lock(err.to_string())
    }
}
