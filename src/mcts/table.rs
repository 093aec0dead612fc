//! Transposition table: position hash to shared statistics record.
//!
//! Keys are Zobrist hashes only. The tree verifies the stored position on
//! every hit and reports a mismatch through `note_collision`; the colliding
//! child then gets a private record that is never inserted, so at decision
//! time `len() != expanded nodes` signals that a collision happened.
//!
//! The table lives for one decision and is cleared before the next one.

use rustc_hash::FxHashMap;

use super::record::RecordId;

/// Hash-keyed map from positions to their shared records.
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: FxHashMap<u64, RecordId>,
    hits: u32,
    misses: u32,
    collisions: u32,
}

impl TranspositionTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with room for `capacity` positions.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            ..Self::default()
        }
    }

    /// Find the record stored for `hash`, counting a hit or a miss.
    #[inline]
    pub fn lookup(&mut self, hash: u64) -> Option<RecordId> {
        let found = self.entries.get(&hash).copied();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    /// Store `record` under `hash`, replacing any previous entry.
    #[inline]
    pub fn insert(&mut self, hash: u64, record: RecordId) {
        self.entries.insert(hash, record);
    }

    /// A hit turned out to be a different position.
    pub fn note_collision(&mut self) {
        self.collisions += 1;
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
        self.collisions = 0;
    }

    /// Number of stored positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the table empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups that found an entry (collisions included).
    #[must_use]
    pub fn hits(&self) -> u32 {
        self.hits
    }

    /// Lookups that found nothing.
    #[must_use]
    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// Hits whose stored position differed from the looked-up one.
    #[must_use]
    pub fn collisions(&self) -> u32 {
        self.collisions
    }

    /// Hits as a percentage of `visits`.
    #[must_use]
    pub fn hit_rate(&self, visits: u32) -> f64 {
        if visits == 0 {
            0.0
        } else {
            f64::from(self.hits) * 100.0 / f64::from(visits)
        }
    }
}
