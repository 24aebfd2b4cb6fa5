//! Last-good-reading cache.
//!
//! Holds at most one validated reading. There is no TTL: a stored entry is
//! reused until a user-triggered refresh replaces it.

use chrono::{DateTime, Utc};

use crate::model::Refresher;
use crate::reading::Reading;

/// A validated reading plus the local time it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheEntry {
    pub reading: Reading,
    pub fetched_at: DateTime<Utc>,
}

/// Single-entry cache consulted at the start of every network refresh.
#[derive(Debug, Default)]
pub struct ReadingCache {
    entry: Option<CacheEntry>,
}

impl ReadingCache {
    /// Entry to reuse for the given request mode, if the policy allows.
    ///
    /// `User` requests always go to the network; `Timer` requests reuse
    /// whatever is stored.
    pub fn lookup(&self, refresher: Refresher) -> Option<CacheEntry> {
        match refresher {
            Refresher::User => None,
            Refresher::Timer => self.entry,
        }
    }

    /// Replace the stored entry with a fresh reading.
    pub fn store(&mut self, reading: Reading, fetched_at: DateTime<Utc>) {
        self.entry = Some(CacheEntry {
            reading,
            fetched_at,
        });
    }
}
