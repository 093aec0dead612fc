//! MCTS node structure.
//!
//! Uses arena-based allocation with index references (NodeId). A node does
//! not own its statistics: it holds a `RecordId` that other nodes reaching
//! the same position share.

use smallvec::SmallVec;

use super::record::RecordId;

/// Index into the tree's node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Check if this refers to a node.
    #[inline]
    #[must_use]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// Expansion state of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeStatus {
    /// Some candidate moves have not been tried yet.
    Unexpanded,
    /// Every candidate move has a child.
    Expanded,
    /// The position is decided; the node never gets children.
    Terminal,
}

/// A node in the search tree.
#[derive(Clone, Debug)]
pub struct MCTSNode {
    /// Parent node (NONE for root). Does not own the parent.
    pub parent: NodeId,

    /// Move that led here from the parent (unused at the root).
    pub action: u16,

    /// Statistics for this node's position, possibly shared.
    pub record: RecordId,

    /// Children in expansion order.
    pub children: SmallVec<[NodeId; 4]>,

    /// Legal moves of the position, shuffled once at creation.
    /// Expansion consumes `actions[..untried]` from the back; rollouts
    /// read the whole list.
    pub actions: Box<[u16]>,

    /// Number of moves at the front of `actions` not yet expanded.
    pub untried: u16,
}

impl MCTSNode {
    /// Create a node over `record` with pre-shuffled `actions`.
    ///
    /// Terminal positions must pass an empty action list.
    pub fn new(parent: NodeId, action: u16, record: RecordId, actions: Box<[u16]>) -> Self {
        let untried = actions.len() as u16;
        Self {
            parent,
            action,
            record,
            children: SmallVec::new(),
            actions,
            untried,
        }
    }

    /// Is this the root?
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Are there moves left to expand?
    #[inline]
    #[must_use]
    pub fn has_untried(&self) -> bool {
        self.untried > 0
    }

    /// Take the next move to expand.
    #[inline]
    pub fn pop_untried(&mut self) -> Option<u16> {
        if self.untried == 0 {
            return None;
        }
        self.untried -= 1;
        Some(self.actions[self.untried as usize])
    }

    /// Moves not yet expanded.
    #[must_use]
    pub fn untried_actions(&self) -> &[u16] {
        &self.actions[..self.untried as usize]
    }

    /// Expansion state, given whether the position is terminal.
    #[must_use]
    pub fn status(&self, terminal: bool) -> NodeStatus {
        if terminal {
            NodeStatus::Terminal
        } else if self.has_untried() {
            NodeStatus::Unexpanded
        } else {
            NodeStatus::Expanded
        }
    }
}
