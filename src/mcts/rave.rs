//! Rapid Action Value Estimation counters.
//!
//! For every tree node, counts of rollouts that passed through the node and
//! whose leaf was entered by a given action, split by outcome. A child's
//! RAVE estimate is read from its parent's counters under the child's
//! incoming action. Counters are scoped to one tree and cleared with the
//! transposition table.

use crate::core::{Outcome, PlayerId};

use super::node::NodeId;

/// Per (node, action) RAVE counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RaveStats {
    /// Rollouts credited to this action.
    pub visits: u32,
    /// Player-0 wins, player-1 wins, draws.
    pub results: [u32; Outcome::COUNT],
}

impl RaveStats {
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
}

/// Tree-scoped RAVE counters: one row per node, indexed by action.
///
/// Rows are allocated the first time a node is credited and grow to the
/// largest action seen, so crediting a path costs one bounds check per node.
#[derive(Debug, Default)]
pub struct RaveTable {
    rows: Vec<Vec<RaveStats>>,
}

impl RaveTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `action` with `outcome` at `node`.
    #[inline]
    pub fn credit(&mut self, node: NodeId, action: u16, outcome: Outcome) {
        let node = node.raw() as usize;
        let action = usize::from(action);
        if self.rows.len() <= node {
            self.rows.resize_with(node + 1, Vec::new);
        }
        let row = &mut self.rows[node];
        if row.len() <= action {
            row.resize(action + 1, RaveStats::default());
        }
        let stats = &mut row[action];
        stats.visits += 1;
        stats.results[outcome.index()] += 1;
    }

    /// Counters for `action` at `node`.
    #[inline]
    #[must_use]
    pub fn get(&self, node: NodeId, action: u16) -> RaveStats {
        self.rows
            .get(node.raw() as usize)
            .and_then(|row| row.get(usize::from(action)))
            .copied()
            .unwrap_or_default()
    }

    /// Rollouts credited to `action` at `node`.
    #[inline]
    #[must_use]
    pub fn visits(&self, node: NodeId, action: u16) -> u32 {
        self.get(node, action).visits
    }

    /// Signed RAVE margin for `action` at `node`.
    #[inline]
    #[must_use]
    pub fn score_delta(&self, node: NodeId, action: u16, perspective: PlayerId) -> i64 {
        self.get(node, action).score_delta(perspective)
    }

    /// Drop every counter.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Number of (node, action) pairs with counters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|stats| stats.visits > 0)
            .count()
    }

    /// Is the table empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|stats| stats.visits == 0)
    }
}
