//! Selection formulas and root move policies.
//!
//! - `uct_score`: Upper Confidence Bound for Trees,
//!   `Q + C * sqrt(2 * ln(N) / n)`.
//! - `rave_beta`: weight of the RAVE estimate in the blended value,
//!   `r / (r + n + 4 * r * n * K)`.
//! - `FinalSelection`: how the move is chosen among the root's children
//!   once the budget is spent.

use serde::{Deserialize, Serialize};

use super::node::NodeId;
use super::tree::MCTSTree;

/// UCT score of a child with mean value `q` and `child_visits` visits under
/// a parent whose visit count has natural log `ln_parent`.
#[inline]
#[must_use]
pub fn uct_score(q: f64, ln_parent: f64, child_visits: u32, exploration: f64) -> f64 {
    q + exploration * (2.0 * ln_parent / f64::from(child_visits)).sqrt()
}

/// Weight of the RAVE estimate for a child with `child_visits` real visits
/// and `rave_visits` RAVE visits.
#[inline]
#[must_use]
pub fn rave_beta(rave_visits: u32, child_visits: u32, bias: f64) -> f64 {
    let r = f64::from(rave_visits);
    let n = f64::from(child_visits);
    let denominator = r + n + 4.0 * r * n * bias;
    if denominator == 0.0 {
        0.0
    } else {
        r / denominator
    }
}

/// Root-level move policy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FinalSelection {
    /// The most visited child.
    RobustChild,
    /// Among children holding more than `threshold` of the root's visits,
    /// the one with the best mean value. Falls back to the robust child
    /// when none qualifies.
    Confident { threshold: f64 },
}

/// Child picked by a `FinalSelection`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinalChoice {
    /// The chosen child.
    pub node: NodeId,
    /// Its incoming move.
    pub action: u16,
    /// No child cleared the confidence threshold.
    pub low_confidence: bool,
}

impl FinalSelection {
    /// Pick a child of `parent`. `None` if it has no children.
    #[must_use]
    pub fn select<const N: usize>(&self, tree: &MCTSTree<N>, parent: NodeId) -> Option<FinalChoice> {
        match *self {
            FinalSelection::RobustChild => {
                robust_child(tree, parent).map(|node| choice(tree, node, false))
            }
            FinalSelection::Confident { threshold } => {
                let parent_visits = f64::from(tree.visits(parent).max(1));
                let confident = best_by_value_where(tree, parent, |child| {
                    f64::from(tree.visits(child)) / parent_visits > threshold
                });
                match confident {
                    Some(node) => Some(choice(tree, node, false)),
                    None => robust_child(tree, parent).map(|node| choice(tree, node, true)),
                }
            }
        }
    }
}

fn choice<const N: usize>(tree: &MCTSTree<N>, node: NodeId, low_confidence: bool) -> FinalChoice {
    FinalChoice {
        node,
        action: tree.node(node).action,
        low_confidence,
    }
}

/// The child with the most visits; the first one wins ties.
#[must_use]
pub fn robust_child<const N: usize>(tree: &MCTSTree<N>, parent: NodeId) -> Option<NodeId> {
    let mut best: Option<(NodeId, u32)> = None;
    for &child in tree.children(parent) {
        let visits = tree.visits(child);
        if best.map_or(true, |(_, most)| visits > most) {
            best = Some((child, visits));
        }
    }
    best.map(|(node, _)| node)
}

/// The child with the highest mean value for the player to move at
/// `parent`; the first one wins ties.
#[must_use]
pub fn best_by_value<const N: usize>(tree: &MCTSTree<N>, parent: NodeId) -> Option<NodeId> {
    best_by_value_where(tree, parent, |_| true)
}

fn best_by_value_where<const N: usize>(
    tree: &MCTSTree<N>,
    parent: NodeId,
    mut keep: impl FnMut(NodeId) -> bool,
) -> Option<NodeId> {
    let perspective = tree.record_of(parent).state.to_move();
    let mut best: Option<(NodeId, f64)> = None;
    for &child in tree.children(parent) {
        if !keep(child) {
            continue;
        }
        let q = tree.record_of(child).mean(perspective);
        if best.map_or(true, |(_, top)| q > top) {
            best = Some((child, q));
        }
    }
    best.map(|(node, _)| node)
}
