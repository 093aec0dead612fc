//! Search driver.
//!
//! `MCTSSearch` runs a fixed number of iterations or a time budget from a
//! position, picks the root move with the configured final policy, applies
//! it to the caller's state and reports what it saw. Transposition and
//! RAVE tables are cleared after every decision; finished trees are handed
//! to the reaper.

use std::mem;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

use crate::core::{GameError, GameRng, State};

use super::config::{ConfigError, MCTSConfig};
use super::node::NodeId;
use super::policy::FinalSelection;
use super::reaper::TreeReaper;
use super::stats::{ChildReport, SearchOutcome, SearchStats, SearchWarning};
use super::table::TranspositionTable;
use super::tree::{MCTSTree, SearchContext};

/// Reasons a search request is refused.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SearchError {
    #[error("search budget must be at least one iteration")]
    EmptyBudget,

    #[error("{requested} iterations requested, ceiling is {limit}")]
    TooManySimulations { requested: u32, limit: u32 },

    #[error("position is already decided")]
    TerminalPosition,

    #[error("tree was built for a different position")]
    PositionMismatch,

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// MCTS player for an `N x N` board.
///
/// Owns the session state (RNG, tables, logarithm cache) so repeated
/// decisions with the same seed are reproducible.
#[derive(Debug)]
pub struct MCTSSearch<const N: usize> {
    ctx: SearchContext,
    reaper: TreeReaper,
    stats: SearchStats,
    pending: Vec<SearchWarning>,
}

impl<const N: usize> MCTSSearch<N> {
    /// Create a search session.
    pub fn new(config: MCTSConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            reaper: TreeReaper::new(config.background_teardown),
            ctx: SearchContext::new(config),
            stats: SearchStats::default(),
            pending: Vec::new(),
        })
    }

    /// Search `iterations` times from `state` and play the chosen move.
    pub fn run_for_iterations(
        &mut self,
        state: &mut State<N>,
        iterations: u32,
    ) -> Result<SearchOutcome, SearchError> {
        let tree = self.explore(state, iterations)?;
        self.decide(tree, state)
    }

    /// Search from `state` until `budget` has elapsed and play the chosen
    /// move.
    pub fn run_for_duration(
        &mut self,
        state: &mut State<N>,
        budget: Duration,
    ) -> Result<SearchOutcome, SearchError> {
        let tree = self.explore_for(state, budget)?;
        self.decide(tree, state)
    }

    /// Build a tree of `iterations` simulations without committing to a
    /// move.
    pub fn explore(
        &mut self,
        state: &State<N>,
        iterations: u32,
    ) -> Result<MCTSTree<N>, SearchError> {
        self.check_budget(iterations)?;
        if state.terminal() {
            return Err(SearchError::TerminalPosition);
        }

        let start = Instant::now();
        let mut tree = self.begin(state);
        for _ in 0..iterations {
            tree.iterate(&mut self.ctx);
        }
        self.record_stats(&tree, iterations, start);
        Ok(tree)
    }

    /// Build a tree for roughly `budget` without committing to a move.
    ///
    /// At least one batch of `time_check_batch` iterations runs even if the
    /// budget is already spent. The search stops early when another batch
    /// would pass `max_simulations`.
    pub fn explore_for(
        &mut self,
        state: &State<N>,
        budget: Duration,
    ) -> Result<MCTSTree<N>, SearchError> {
        if state.terminal() {
            return Err(SearchError::TerminalPosition);
        }

        let start = Instant::now();
        let deadline = start + budget;
        let batch = self.ctx.config.time_check_batch;
        let limit = self.ctx.config.max_simulations;

        let mut tree = self.begin(state);
        let mut done = 0u32;
        loop {
            let run = batch.min(limit - done);
            for _ in 0..run {
                tree.iterate(&mut self.ctx);
            }
            done += run;

            if Instant::now() >= deadline {
                break;
            }
            if limit - done < batch {
                warn!(limit, "timed search reached the simulation ceiling");
                self.pending.push(SearchWarning::SimulationCeiling { limit });
                break;
            }
        }

        self.record_stats(&tree, done, start);
        Ok(tree)
    }

    /// Pick the root move of `tree`, play it on `state` and release the
    /// tree.
    ///
    /// `state` must still be the position the tree was built from.
    pub fn decide(
        &mut self,
        tree: MCTSTree<N>,
        state: &mut State<N>,
    ) -> Result<SearchOutcome, SearchError> {
        let root = tree.root();
        if !tree.state(root).same_position(state) {
            return Err(SearchError::PositionMismatch);
        }

        let selection = self.ctx.config.final_selection;
        let choice = selection
            .select(&tree, root)
            .ok_or(SearchError::TerminalPosition)?;

        let root_record = tree.record_of(root);
        let root_visits = root_record.visits;
        let root_results = root_record.results;

        let mut warnings = mem::take(&mut self.pending);
        if choice.low_confidence {
            if let FinalSelection::Confident { threshold } = selection {
                let best_share = f64::from(tree.visits(choice.node)) / f64::from(root_visits.max(1));
                warn!(best_share, threshold, "no child cleared the confidence threshold");
                warnings.push(SearchWarning::LowConfidence {
                    best_share,
                    threshold,
                });
            }
        }
        let table_size = self.ctx.table.len();
        let expanded = tree.expanded_nodes();
        if table_size != expanded as usize {
            warn!(table_size, expanded, "transposition table hash collision");
            warnings.push(SearchWarning::HashCollision {
                table_size,
                expanded,
            });
        }

        let children = self.child_reports(&tree, root);
        let mover = state.to_move();
        state.try_action(usize::from(choice.action))?;
        let (x, y) = State::<N>::coords_of(choice.action);

        debug!(
            x,
            y,
            %mover,
            visits = tree.visits(choice.node),
            root_visits,
            hit_rate = self.ctx.table.hit_rate(root_visits),
            iterations_per_second = self.stats.iterations_per_second(),
            "move decided"
        );

        self.reaper.dispose(tree);
        self.ctx.reset();

        Ok(SearchOutcome {
            action: choice.action,
            x,
            y,
            mover,
            root_visits,
            root_results,
            children,
            warnings,
            stats: self.stats.clone(),
        })
    }

    /// Forget the per-decision tables, pending warnings and statistics, and
    /// restart the RNG from the configured seed.
    ///
    /// A search after `reset` repeats the session's first search exactly.
    pub fn reset(&mut self) {
        self.ctx.reset();
        self.ctx.rng = GameRng::new(self.ctx.config.seed);
        self.pending.clear();
        self.stats.reset();
    }

    /// Statistics of the last search.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the config.
    pub fn config(&self) -> &MCTSConfig {
        &self.ctx.config
    }

    /// The transposition table of the current decision.
    pub fn table(&self) -> &TranspositionTable {
        &self.ctx.table
    }

    fn check_budget(&self, iterations: u32) -> Result<(), SearchError> {
        let limit = self.ctx.config.max_simulations;
        if iterations == 0 {
            Err(SearchError::EmptyBudget)
        } else if iterations > limit {
            Err(SearchError::TooManySimulations {
                requested: iterations,
                limit,
            })
        } else {
            Ok(())
        }
    }

    fn begin(&mut self, state: &State<N>) -> MCTSTree<N> {
        self.pending.clear();
        self.stats.reset();
        MCTSTree::new(state.clone(), &mut self.ctx)
    }

    fn record_stats(&mut self, tree: &MCTSTree<N>, iterations: u32, start: Instant) {
        self.stats = SearchStats {
            iterations,
            nodes_expanded: tree.expanded_nodes(),
            transposition_hits: self.ctx.table.hits(),
            collisions: self.ctx.table.collisions(),
            table_size: self.ctx.table.len(),
            time_us: start.elapsed().as_micros() as u64,
        };
    }

    fn child_reports(&mut self, tree: &MCTSTree<N>, root: NodeId) -> Vec<ChildReport> {
        let ln_parent = self.ctx.log_table.ln(tree.visits(root));
        tree.children(root)
            .iter()
            .map(|&child| {
                let score = tree.child_score(root, child, ln_parent, &self.ctx.config, &self.ctx.rave);
                let record = tree.record_of(child);
                let action = tree.node(child).action;
                let (x, y) = State::<N>::coords_of(action);
                ChildReport {
                    action,
                    x,
                    y,
                    visits: record.visits,
                    results: record.results,
                    q: score.q,
                    uct: score.uct,
                    rave: score.rave_q,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Outcome, PlayerId};

    fn session<const N: usize>(config: MCTSConfig) -> MCTSSearch<N> {
        MCTSSearch::new(config.with_inline_teardown()).unwrap()
    }

    #[test]
    fn test_search_returns_legal_move() {
        let mut search = session::<9>(MCTSConfig::default());
        let mut state = State::<9>::new();

        let outcome = search.run_for_iterations(&mut state, 500).unwrap();

        assert_eq!(state.moves_played(), 1);
        assert_eq!(state.cell(outcome.x, outcome.y), Some(PlayerId::FIRST));
        assert_eq!(outcome.mover, PlayerId::FIRST);
        assert_eq!(outcome.root_visits, 500);
        assert_eq!(outcome.stats.iterations, 500);
        assert!(outcome.chosen().is_some());
        assert!(search.table().is_empty());
    }

    #[test]
    fn test_budget_validation_order() {
        let mut search = session::<9>(MCTSConfig::default().with_max_simulations(100));
        let won = State::<9>::from_moves(&[
            (0, 0), (0, 1),
            (1, 0), (1, 1),
            (2, 0), (2, 1),
            (3, 0), (3, 1),
            (4, 0),
        ])
        .unwrap();
        let mut state = won.clone();

        assert_eq!(
            search.run_for_iterations(&mut state, 0),
            Err(SearchError::EmptyBudget)
        );
        assert_eq!(
            search.run_for_iterations(&mut state, 101),
            Err(SearchError::TooManySimulations {
                requested: 101,
                limit: 100
            })
        );
        assert_eq!(
            search.run_for_iterations(&mut state, 10),
            Err(SearchError::TerminalPosition)
        );
        assert_eq!(state, won);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = MCTSSearch::<9>::new(MCTSConfig::default().with_exploration(f64::NAN));
        assert!(matches!(result, Err(SearchError::Config(ConfigError::Exploration(_)))));
    }

    #[test]
    fn test_decide_rejects_other_position() {
        let mut search = session::<9>(MCTSConfig::default());
        let state = State::<9>::new();
        let tree = search.explore(&state, 50).unwrap();

        let mut other = State::<9>::from_moves(&[(4, 4)]).unwrap();
        assert_eq!(
            search.decide(tree, &mut other),
            Err(SearchError::PositionMismatch)
        );
        assert_eq!(other.moves_played(), 1);
    }

    #[test]
    fn test_hash_collision_warning() {
        let mut search = session::<9>(MCTSConfig::default());
        let mut state = State::<9>::new();
        let tree = search.explore(&state, 100).unwrap();

        // An entry no expansion accounts for.
        let root_record = tree.node(tree.root()).record;
        search.ctx.table.insert(0xdead_beef, root_record);

        let outcome = search.decide(tree, &mut state).unwrap();
        assert!(outcome.has_warning(|w| matches!(w, SearchWarning::HashCollision { .. })));
    }

    #[test]
    fn test_low_confidence_warning() {
        let config = MCTSConfig::default()
            .with_final_selection(FinalSelection::Confident { threshold: 1.0 });
        let mut search = session::<9>(config);
        let mut state = State::<9>::new();

        let outcome = search.run_for_iterations(&mut state, 200).unwrap();

        // No child can hold more than all of the root's visits.
        assert!(outcome.has_warning(|w| matches!(w, SearchWarning::LowConfidence { .. })));
        let most = outcome.children.iter().map(|c| c.visits).max().unwrap();
        assert_eq!(outcome.chosen().unwrap().visits, most);
    }

    #[test]
    fn test_timed_search_stops_at_ceiling() {
        let config = MCTSConfig::default()
            .with_max_simulations(250)
            .with_time_check_batch(100);
        let mut search = session::<9>(config);
        let mut state = State::<9>::new();

        let outcome = search
            .run_for_duration(&mut state, Duration::from_secs(60))
            .unwrap();

        assert_eq!(outcome.root_visits, 200);
        assert!(outcome.has_warning(|w| *w == SearchWarning::SimulationCeiling { limit: 250 }));
    }

    #[test]
    fn test_timed_search_runs_one_batch() {
        let config = MCTSConfig::default().with_time_check_batch(64);
        let mut search = session::<9>(config);
        let mut state = State::<9>::new();

        let outcome = search.run_for_duration(&mut state, Duration::ZERO).unwrap();

        assert_eq!(outcome.root_visits, 64);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_finds_immediate_win() {
        // Player 0 has four in a row with both ends open.
        let mut state = State::<9>::from_moves(&[
            (2, 4), (2, 0),
            (3, 4), (8, 8),
            (4, 4), (0, 8),
            (5, 4), (8, 0),
        ])
        .unwrap();
        let mut search = session::<9>(MCTSConfig::default());

        let outcome = search.run_for_iterations(&mut state, 3000).unwrap();

        assert!(
            (outcome.x, outcome.y) == (1, 4) || (outcome.x, outcome.y) == (6, 4),
            "played ({}, {})",
            outcome.x,
            outcome.y
        );
        assert_eq!(state.outcome(), Some(Outcome::Win(PlayerId::FIRST)));
    }

    #[test]
    fn test_stats_recorded() {
        let mut search = session::<9>(MCTSConfig::default());
        let state = State::<9>::new();

        let tree = search.explore(&state, 300).unwrap();

        let stats = search.stats();
        assert_eq!(stats.iterations, 300);
        assert_eq!(stats.nodes_expanded, tree.expanded_nodes());
        assert_eq!(stats.table_size, search.table().len());
        assert_eq!(stats.collisions, 0);
    }
}
