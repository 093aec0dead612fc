//! Arena-based search tree and the four MCTS phases.
//!
//! Nodes and statistics records live in two flat vectors referenced by
//! `NodeId` and `RecordId`. Transposing nodes hold the same `RecordId`, so
//! a rollout credited through either path lands in the same counters.
//! Parent links are plain ids and own nothing. Dropping the tree releases
//! every node and record at once, and the whole tree is `Send`, so it can
//! be handed to a background thread for teardown.

use tracing::trace;

use crate::core::{GameRng, Outcome, PlayerId, State};

use super::config::MCTSConfig;
use super::log_table::LogTable;
use super::node::{MCTSNode, NodeId, NodeStatus};
use super::policy::{rave_beta, uct_score};
use super::rave::RaveTable;
use super::record::{RecordId, Statistics};
use super::stats::TreeStats;
use super::table::TranspositionTable;

/// Per-session search state shared by every tree the session builds.
///
/// The transposition table and RAVE counters are scoped to one tree and
/// are cleared whenever a new tree is built; the RNG and the log table live
/// for the whole session.
#[derive(Debug)]
pub struct SearchContext {
    /// Search parameters.
    pub config: MCTSConfig,
    /// Shuffles and rollout offsets.
    pub rng: GameRng,
    /// Position hash to shared record.
    pub table: TranspositionTable,
    /// RAVE counters (untouched unless enabled).
    pub rave: RaveTable,
    /// Cached `ln(visits)`.
    pub log_table: LogTable,
}

impl SearchContext {
    /// Create a context from a configuration.
    #[must_use]
    pub fn new(config: MCTSConfig) -> Self {
        Self {
            rng: GameRng::new(config.seed),
            table: TranspositionTable::new(),
            rave: RaveTable::new(),
            log_table: LogTable::new(config.max_simulations as usize + 1),
            config,
        }
    }

    /// Clear the per-tree tables.
    pub fn reset(&mut self) {
        self.table.clear();
        self.rave.clear();
    }
}

/// What `expand` attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expansion {
    /// A child with a record of its own, ready for rollout.
    Fresh(NodeId),
    /// A child sharing the record of an already expanded position.
    Transposed(NodeId),
}

/// Selection scores of one child.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildScore {
    /// Mean score delta from the parent's mover's perspective.
    pub q: f64,
    /// `q` plus the exploration bonus.
    pub uct: f64,
    /// RAVE mean, when RAVE is enabled and the action has RAVE visits.
    pub rave_q: Option<f64>,
    /// Weight given to `rave_q`.
    pub beta: f64,
    /// Value used for selection.
    pub score: f64,
}

/// Arena-based MCTS tree.
#[derive(Debug)]
pub struct MCTSTree<const N: usize> {
    nodes: Vec<MCTSNode>,
    records: Vec<Statistics<N>>,
    root: NodeId,
    expanded: u32,
}

impl<const N: usize> MCTSTree<N> {
    /// Create a tree whose root wraps `state`.
    ///
    /// Clears the context's per-tree tables, whose record ids point into the
    /// previous tree. The root's record is not entered into the
    /// transposition table: no deeper position can equal it.
    pub fn new(state: State<N>, ctx: &mut SearchContext) -> Self {
        ctx.reset();
        let mut tree = Self {
            nodes: Vec::with_capacity(1024),
            records: Vec::with_capacity(1024),
            root: NodeId::NONE,
            expanded: 0,
        };
        let record = tree.alloc_record(state);
        tree.root = tree.alloc_node(NodeId::NONE, 0, record, ctx);
        tree
    }

    fn alloc_record(&mut self, state: State<N>) -> RecordId {
        let id = RecordId(self.records.len() as u32);
        self.records.push(Statistics::new(state));
        id
    }

    fn alloc_node(
        &mut self,
        parent: NodeId,
        action: u16,
        record: RecordId,
        ctx: &mut SearchContext,
    ) -> NodeId {
        let state = &self.records[record.0 as usize].state;
        let actions = if state.terminal() {
            Box::default()
        } else {
            let mut actions = state.possible_actions();
            ctx.rng.shuffle(&mut actions);
            actions.into_boxed_slice()
        };

        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(MCTSNode::new(parent, action, record, actions));
        if parent.is_some() {
            self.nodes[parent.0 as usize].children.push(id);
        }
        id
    }

    /// One full iteration: selection and expansion, rollout,
    /// backpropagation.
    pub fn iterate(&mut self, ctx: &mut SearchContext) -> Outcome {
        let leaf = self.policy(ctx);
        self.rollout(leaf, ctx)
    }

    /// Descend from the root to the node to roll out.
    ///
    /// Terminal nodes are returned as they are. A node with untried moves
    /// is expanded; a fresh child is returned for rollout, while a
    /// transposed child is only attached and selection continues at the
    /// same node. Fully expanded nodes hand over to `best_child`.
    pub fn policy(&mut self, ctx: &mut SearchContext) -> NodeId {
        let mut current = self.root;
        loop {
            if self.record_of(current).state.terminal() {
                return current;
            }
            if self.node(current).has_untried() {
                match self.expand(current, ctx) {
                    Some(Expansion::Fresh(child)) => return child,
                    Some(Expansion::Transposed(_)) => continue,
                    None => return current,
                }
            }
            match self.best_child(current, ctx) {
                Some(child) => current = child,
                // Unreachable: a non-terminal node without untried moves
                // has children.
                None => return current,
            }
        }
    }

    /// Attach a child for the next untried move of `node`.
    ///
    /// Returns `None` if every move has been expanded already.
    pub fn expand(&mut self, node: NodeId, ctx: &mut SearchContext) -> Option<Expansion> {
        let action = self.nodes[node.0 as usize].pop_untried()?;

        let mut state = self.record_of(node).state.clone();
        state.action(action);
        let hash = state.hash();

        if let Some(shared) = ctx.table.lookup(hash) {
            let same = self
                .records
                .get(shared.0 as usize)
                .is_some_and(|record| record.state.same_position(&state));
            if same {
                trace!(action, hash, record = shared.raw(), "transposition hit");
                let child = self.alloc_node(node, action, shared, ctx);
                return Some(Expansion::Transposed(child));
            }

            // Same key, different position (or a record this tree never
            // allocated): keep the stored entry and give this child a
            // private record.
            ctx.table.note_collision();
            trace!(action, hash, "hash collision");
            let record = self.alloc_record(state);
            self.expanded += 1;
            let child = self.alloc_node(node, action, record, ctx);
            return Some(Expansion::Fresh(child));
        }

        let record = self.alloc_record(state);
        ctx.table.insert(hash, record);
        self.expanded += 1;
        let child = self.alloc_node(node, action, record, ctx);
        Some(Expansion::Fresh(child))
    }

    /// Play `node`'s position out and backpropagate the result.
    ///
    /// The rollout walks the node's pre-shuffled move list cyclically from
    /// one random offset, so it costs a single RNG draw. A terminal node
    /// backpropagates its own outcome.
    pub fn rollout(&mut self, node: NodeId, ctx: &mut SearchContext) -> Outcome {
        let search_node = &self.nodes[node.0 as usize];
        let record = &self.records[search_node.record.0 as usize];

        let outcome = match record.state.outcome() {
            Some(outcome) => outcome,
            // Only terminal positions are created without moves.
            None if search_node.actions.is_empty() => Outcome::Draw,
            None => {
                let actions = &search_node.actions;
                let len = actions.len();
                let mut state = record.state.clone();
                let mut offset = ctx.rng.gen_range_usize(0..len);
                loop {
                    state.action(actions[offset % len]);
                    offset += 1;
                    if let Some(outcome) = state.outcome() {
                        break outcome;
                    }
                }
            }
        };

        self.backpropagate(node, outcome, ctx);
        outcome
    }

    /// Count `outcome` in every record from `leaf` up to the root.
    ///
    /// With RAVE enabled, every node on the path also credits the leaf's
    /// incoming move.
    pub fn backpropagate(&mut self, leaf: NodeId, outcome: Outcome, ctx: &mut SearchContext) {
        let leaf_node = &self.nodes[leaf.0 as usize];
        let rave_action = (ctx.config.rave && !leaf_node.is_root()).then_some(leaf_node.action);

        let mut current = leaf;
        while current.is_some() {
            let node = &self.nodes[current.0 as usize];
            self.records[node.record.0 as usize].record(outcome);
            if let Some(action) = rave_action {
                ctx.rave.credit(current, action, outcome);
            }
            current = node.parent;
        }
    }

    /// The child of `node` with the highest selection score; the first one
    /// wins ties. `None` only if `node` has no children.
    pub fn best_child(&self, node: NodeId, ctx: &mut SearchContext) -> Option<NodeId> {
        let ln_parent = ctx.log_table.ln(self.visits(node));

        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        for &child in self.children(node) {
            let score = self.child_score(node, child, ln_parent, &ctx.config, &ctx.rave).score;
            if score > best_score {
                best_score = score;
                best = Some(child);
            }
        }
        best.or_else(|| self.children(node).first().copied())
    }

    /// Selection scores of `child` under `parent`.
    ///
    /// Unvisited children score infinity so they are tried first.
    #[must_use]
    pub fn child_score(
        &self,
        parent: NodeId,
        child: NodeId,
        ln_parent: f64,
        config: &MCTSConfig,
        rave: &RaveTable,
    ) -> ChildScore {
        let turn = self.record_of(parent).state.to_move();
        let record = self.record_of(child);
        let visits = record.visits;
        let q = record.mean(turn);

        if visits == 0 {
            return ChildScore {
                q,
                uct: f64::INFINITY,
                rave_q: None,
                beta: 0.0,
                score: f64::INFINITY,
            };
        }

        let uct = uct_score(q, ln_parent, visits, config.exploration_constant);
        let exploration = uct - q;

        let action = self.node(child).action;
        let rave_stats = rave.get(parent, action);
        if !config.rave || rave_stats.visits == 0 {
            return ChildScore {
                q,
                uct,
                rave_q: None,
                beta: 0.0,
                score: uct,
            };
        }

        let rave_q = rave_stats.score_delta(turn) as f64 / f64::from(rave_stats.visits);
        let beta = rave_beta(rave_stats.visits, visits, config.rave_bias);
        ChildScore {
            q,
            uct,
            rave_q: Some(rave_q),
            beta,
            score: (1.0 - beta) * q + beta * rave_q + exploration,
        }
    }

    /// The root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a record by ID.
    #[inline]
    #[must_use]
    pub fn record(&self, id: RecordId) -> &Statistics<N> {
        &self.records[id.0 as usize]
    }

    /// The record a node points at.
    #[inline]
    #[must_use]
    pub fn record_of(&self, id: NodeId) -> &Statistics<N> {
        self.record(self.node(id).record)
    }

    /// The position a node wraps.
    #[inline]
    #[must_use]
    pub fn state(&self, id: NodeId) -> &State<N> {
        &self.record_of(id).state
    }

    /// Children of a node in expansion order.
    #[inline]
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Parent of a node, `None` for the root.
    #[inline]
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id).parent;
        parent.is_some().then_some(parent)
    }

    /// Visit count of a node's record.
    #[inline]
    #[must_use]
    pub fn visits(&self, id: NodeId) -> u32 {
        self.record_of(id).visits
    }

    /// Mean value of a node from `perspective`.
    #[must_use]
    pub fn mean(&self, id: NodeId, perspective: PlayerId) -> f64 {
        self.record_of(id).mean(perspective)
    }

    /// Expansion state of a node.
    #[must_use]
    pub fn status(&self, id: NodeId) -> NodeStatus {
        self.node(id).status(self.state(id).terminal())
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (never true after construction).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct records (root included).
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Records created by expansion, counted independently of the
    /// transposition table.
    #[must_use]
    pub fn expanded_nodes(&self) -> u32 {
        self.expanded
    }

    /// Structural sanity check: every record satisfies
    /// `visits == sum(results)`, every child links back to its parent and
    /// moves to a position one stone deeper, and terminal nodes have no
    /// children.
    #[must_use]
    pub fn check_invariants(&self) -> bool {
        if !self.records.iter().all(Statistics::is_consistent) {
            return false;
        }
        self.iter().all(|(id, node)| {
            let state = self.state(id);
            if state.terminal() && !node.children.is_empty() {
                return false;
            }
            if node.untried as usize > node.actions.len() {
                return false;
            }
            node.children.iter().all(|&child| {
                let child_node = self.node(child);
                let (x, y) = State::<N>::coords_of(child_node.action);
                child_node.parent == id
                    && self.state(child).moves_played() == state.moves_played() + 1
                    && state.is_empty(x, y)
                    && !self.state(child).is_empty(x, y)
            })
        })
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MCTSNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        // Children are always allocated after their parent.
        let mut depths = vec![0u16; self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            if node.parent.is_some() {
                depths[i] = depths[node.parent.0 as usize] + 1;
            }
        }
        let terminal_nodes = self
            .nodes
            .iter()
            .filter(|n| self.record(n.record).state.terminal())
            .count();

        TreeStats {
            node_count: self.nodes.len(),
            record_count: self.records.len(),
            max_depth: depths.into_iter().max().unwrap_or(0),
            terminal_nodes,
        }
    }
}
