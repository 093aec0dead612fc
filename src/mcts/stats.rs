//! Search diagnostics and per-decision reports.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Statistics collected during one search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Total iterations performed.
    pub iterations: u32,

    /// Records created by expansion.
    pub nodes_expanded: u32,

    /// Expansions that reused a stored record.
    pub transposition_hits: u32,

    /// Lookups that matched a key but not the position.
    pub collisions: u32,

    /// Entries in the transposition table when the search ended.
    pub table_size: usize,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Calculate iterations per second.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Transposition hits as a percentage of iterations.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            100.0 * self.transposition_hits as f64 / self.iterations as f64
        }
    }
}

/// Shape of a search tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Nodes in the arena, root included.
    pub node_count: usize,
    /// Distinct statistics records.
    pub record_count: usize,
    /// Deepest node, in moves below the root.
    pub max_depth: u16,
    /// Nodes whose position is decided.
    pub terminal_nodes: usize,
}

impl TreeStats {
    /// Nodes that share a record with another node.
    #[must_use]
    pub fn shared_nodes(&self) -> usize {
        self.node_count.saturating_sub(self.record_count)
    }
}

/// One root child as seen at decision time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChildReport {
    /// Move index.
    pub action: u16,
    /// Column of the move.
    pub x: usize,
    /// Row of the move.
    pub y: usize,
    /// Simulations through this child's record.
    pub visits: u32,
    /// Player-0 wins, player-1 wins, draws.
    pub results: [u32; 3],
    /// Mean value for the player to move at the root.
    pub q: f64,
    /// UCT score at the end of the search.
    pub uct: f64,
    /// RAVE mean, when RAVE was used and has data for this move.
    pub rave: Option<f64>,
}

/// Non-fatal conditions noticed during a decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SearchWarning {
    /// The table holds fewer positions than were expanded, so at least one
    /// 64-bit key was shared by two positions.
    HashCollision { table_size: usize, expanded: u32 },
    /// No child cleared the confidence threshold; the most visited one was
    /// played instead.
    LowConfidence { best_share: f64, threshold: f64 },
    /// A time-budgeted search stopped at the simulation ceiling.
    SimulationCeiling { limit: u32 },
}

impl fmt::Display for SearchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchWarning::HashCollision {
                table_size,
                expanded,
            } => write!(
                f,
                "hash collision: {} table entries for {} expanded nodes",
                table_size, expanded
            ),
            SearchWarning::LowConfidence {
                best_share,
                threshold,
            } => write!(
                f,
                "low confidence: best child holds {:.1}% of visits, threshold {:.1}%",
                best_share * 100.0,
                threshold * 100.0
            ),
            SearchWarning::SimulationCeiling { limit } => {
                write!(f, "stopped at the simulation ceiling of {}", limit)
            }
        }
    }
}

/// Everything a caller learns from one decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// The move that was applied.
    pub action: u16,
    /// Column of the move.
    pub x: usize,
    /// Row of the move.
    pub y: usize,
    /// Who played it.
    pub mover: PlayerId,
    /// Simulations run from the root.
    pub root_visits: u32,
    /// Root outcomes: player-0 wins, player-1 wins, draws.
    pub root_results: [u32; 3],
    /// Root children in expansion order.
    pub children: Vec<ChildReport>,
    /// Non-fatal conditions noticed during the search.
    pub warnings: Vec<SearchWarning>,
    /// Counters of the search that produced this move.
    pub stats: SearchStats,
}

impl SearchOutcome {
    /// Report for the child that was played.
    #[must_use]
    pub fn chosen(&self) -> Option<&ChildReport> {
        self.children.iter().find(|c| c.action == self.action)
    }

    /// Was a warning matching `predicate` raised?
    #[must_use]
    pub fn has_warning(&self, predicate: impl Fn(&SearchWarning) -> bool) -> bool {
        self.warnings.iter().any(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = SearchStats::new();
        assert_eq!(stats.iterations, 0);
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.iterations_per_second(), 0.0);
    }

    #[test]
    fn test_stats_iterations_per_second() {
        let mut stats = SearchStats::new();
        stats.iterations = 1000;
        stats.time_us = 1_000_000; // 1 second

        assert_eq!(stats.iterations_per_second(), 1000.0);
    }

    #[test]
    fn test_stats_hit_rate() {
        let mut stats = SearchStats::new();
        stats.iterations = 200;
        stats.transposition_hits = 50;

        assert_eq!(stats.hit_rate(), 25.0);

        stats.reset();
        assert_eq!(stats, SearchStats::default());
    }

    #[test]
    fn test_stats_serialization() {
        let mut stats = SearchStats::new();
        stats.iterations = 42;
        stats.table_size = 7;

        let json = serde_json::to_string(&stats).unwrap();
        let deserialized: SearchStats = serde_json::from_str(&json).unwrap();

        assert_eq!(stats, deserialized);
    }

    #[test]
    fn test_shared_nodes() {
        let stats = TreeStats {
            node_count: 10,
            record_count: 8,
            max_depth: 3,
            terminal_nodes: 0,
        };
        assert_eq!(stats.shared_nodes(), 2);
    }

    #[test]
    fn test_warning_display() {
        let collision = SearchWarning::HashCollision {
            table_size: 9,
            expanded: 10,
        };
        assert_eq!(
            collision.to_string(),
            "hash collision: 9 table entries for 10 expanded nodes"
        );

        let low = SearchWarning::LowConfidence {
            best_share: 0.03,
            threshold: 0.05,
        };
        assert!(low.to_string().contains("3.0%"));

        let ceiling = SearchWarning::SimulationCeiling { limit: 1000 };
        assert!(ceiling.to_string().contains("1000"));
    }
}
