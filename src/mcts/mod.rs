//! Monte Carlo Tree Search for five-in-a-row.
//!
//! ## Overview
//!
//! - **UCT selection** with an optional RAVE blend
//! - **Transpositions**: positions reached by different move orders share
//!   one statistics record through a Zobrist-keyed table
//! - **Cheap rollouts**: each node shuffles its moves once; a rollout plays
//!   them cyclically from one random offset
//! - **Budgets**: fixed iteration counts or wall-clock time, bounded by a
//!   hard simulation ceiling
//! - **Background teardown** of finished trees
//!
//! ## Usage
//!
//! ```rust
//! use gomoku_mcts::core::State;
//! use gomoku_mcts::mcts::{MCTSSearch, MCTSConfig};
//!
//! let mut state = State::<9>::new();
//! let mut search = MCTSSearch::new(MCTSConfig::default().with_seed(1)).unwrap();
//!
//! let outcome = search.run_for_iterations(&mut state, 200).unwrap();
//! assert_eq!(state.moves_played(), 1);
//! println!("played ({}, {}) after {} visits", outcome.x, outcome.y, outcome.root_visits);
//! ```

pub mod config;
pub mod log_table;
pub mod node;
pub mod policy;
pub mod rave;
pub mod reaper;
pub mod record;
pub mod search;
pub mod stats;
pub mod table;
pub mod tree;

// Re-export main types
pub use config::{ConfigError, MCTSConfig};
pub use log_table::LogTable;
pub use node::{MCTSNode, NodeId, NodeStatus};
pub use policy::{best_by_value, rave_beta, robust_child, uct_score, FinalChoice, FinalSelection};
pub use rave::{RaveStats, RaveTable};
pub use reaper::TreeReaper;
pub use record::{RecordId, Statistics};
pub use search::{MCTSSearch, SearchError};
pub use stats::{ChildReport, SearchOutcome, SearchStats, SearchWarning, TreeStats};
pub use table::TranspositionTable;
pub use tree::{ChildScore, Expansion, MCTSTree, SearchContext};
