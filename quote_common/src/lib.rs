//!
//! Quote store, reconciliation and shared types used by the quote server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used across the workspace.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `quote` — the `Quote` record and the `CategoryFilter` selection.
//! - `storage` — key-value persistence seam with memory and file backends.
//! - `store` — `QuoteStore`, the owned collection with add/import/export.
//! - `merge` — authoritative-first merge of two collections.
//! - `source` — `QuoteSource` trait and the in-memory `MockServer`.
//! - `reconciler` — a single sync cycle and its outcome/notification.
//! - `scheduler` — periodic sync worker with an injectable clock.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod merge;
pub mod net;
pub mod quote;
pub mod reconciler;
pub mod result;
pub mod scheduler;
pub mod source;
pub mod storage;
pub mod store;

pub use error::QuoteError;
pub use quote::{CategoryFilter, Quote};
pub use reconciler::{Notification, NotificationKind, Reconciler, SyncOutcome};
pub use result::Result;
pub use store::QuoteStore;
