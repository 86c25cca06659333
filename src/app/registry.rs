//! Time-windowed memory of listings that have already been alerted.
//!
//! Keyed by `(source, fingerprint)`. Presence means an alert for that key
//! went out inside the retention window; absence means the next sighting is
//! new. Owned by the cycle engine and never shared.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::{Odd, OddId, SourceKey};

/// Default retention horizon for registry entries.
pub const RETENTION: TimeDelta = TimeDelta::hours(24);

#[derive(Debug, Default)]
pub struct DedupRegistry {
    entries: HashMap<(SourceKey, OddId), Odd>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, source: &SourceKey, id: &OddId) -> bool {
        self.entries.contains_key(&(source.clone(), id.clone()))
    }

    /// Insert or replace the entry for `(source, odd.id)`.
    pub fn put(&mut self, source: &SourceKey, odd: Odd) {
        self.entries.insert((source.clone(), odd.id().clone()), odd);
    }

    /// Remove every entry detected strictly before `now - horizon`.
    ///
    /// Returns how many entries were removed.
    pub fn evict_older_than(&mut self, horizon: TimeDelta) -> usize {
        self.evict_before(Utc::now() - horizon)
    }

    /// Remove every entry detected strictly before `cutoff`.
    pub fn evict_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, odd| odd.detected_at() >= cutoff);
        before - self.entries.len()
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
