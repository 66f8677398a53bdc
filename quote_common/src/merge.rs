//! Merging a local collection with the authoritative one.
//!
//! The authoritative collection always wins: every one of its entries is kept, in
//! its own order and with its own duplicates. Local entries follow, in their own
//! order, but only those with no structurally equal authoritative entry.

use std::collections::HashSet;

use crate::quote::Quote;

/// Merge `local` into `authoritative`, authoritative entries first.
pub fn merge(local: &[Quote], authoritative: &[Quote]) -> Vec<Quote> {
    let known: HashSet<&Quote> = authoritative.iter().collect();
    let mut merged = Vec::with_capacity(authoritative.len() + local.len());
    merged.extend_from_slice(authoritative);
    merged.extend(local.iter().filter(|quote| !known.contains(quote)).cloned());
    merged
}
