//! Outcome statistics for one position.
//!
//! A `Statistics` record is created when a position is first expanded and
//! is shared, through its `RecordId`, by every tree node that later reaches
//! the same position via a different move order.

use crate::core::{Outcome, PlayerId, State};

/// Handle to a `Statistics` record in the tree's record arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordId(pub u32);

impl RecordId {
    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Aggregate rollout results for one position.
///
/// Invariant: `visits == results[0] + results[1] + results[2]`.
#[derive(Clone, Debug)]
pub struct Statistics<const N: usize> {
    /// The position these results summarize.
    pub state: State<N>,

    /// Rollouts that passed through this position.
    pub visits: u32,

    /// Player-0 wins, player-1 wins, draws.
    pub results: [u32; Outcome::COUNT],
}

impl<const N: usize> Statistics<N> {
    /// Fresh record for `state`.
    #[must_use]
    pub fn new(state: State<N>) -> Self {
        Self {
            state,
            visits: 0,
            results: [0; Outcome::COUNT],
        }
    }

    /// Count one rollout ending in `outcome`.
    #[inline]
    pub fn record(&mut self, outcome: Outcome) {
        self.visits += 1;
        self.results[outcome.index()] += 1;
    }

    /// Wins minus losses from `perspective`'s point of view.
    #[inline]
    #[must_use]
    pub fn score_delta(&self, perspective: PlayerId) -> i64 {
        let p0 = i64::from(self.results[0]);
        let p1 = i64::from(self.results[1]);
        if perspective == PlayerId::FIRST {
            p0 - p1
        } else {
            p1 - p0
        }
    }

    /// Mean score delta per visit, 0 when unvisited.
    #[must_use]
    pub fn mean(&self, perspective: PlayerId) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.score_delta(perspective) as f64 / f64::from(self.visits)
        }
    }

    /// Wins for `player`.
    #[must_use]
    pub fn wins(&self, player: PlayerId) -> u32 {
        self.results[player.index()]
    }

    /// Draw count.
    #[must_use]
    pub fn draws(&self) -> u32 {
        self.results[2]
    }

    /// Does `visits` equal the sum of the outcome counters?
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        u64::from(self.visits) == self.results.iter().map(|&r| u64::from(r)).sum::<u64>()
    }
}
