//! # gomoku-mcts
//!
//! A Monte Carlo Tree Search engine for five-in-a-row on square boards.
//!
//! ## Design Principles
//!
//! 1. **Bit-Packed Positions**: Every row, column and diagonal is one `u64`
//!    word, so a five-in-a-row check is a handful of shifts and ANDs.
//!
//! 2. **Size at Compile Time**: The board side is a const generic
//!    (`5..=64`); the standard game is `State<15>`.
//!
//! 3. **Deterministic**: All randomness flows from one seeded `ChaCha8Rng`
//!    and Zobrist keys are fixed, so a seed reproduces a search exactly.
//!
//! ## Architecture
//!
//! - **Arena Tree**: Nodes and statistics records live in flat vectors and
//!   refer to each other by index. Transposed nodes share a record.
//!
//! - **One Decision per Tree**: The transposition table and RAVE counters
//!   are cleared after every move; the old tree is dropped on a background
//!   thread.
//!
//! ## Modules
//!
//! - `core`: Players, bit lines, Zobrist keys, game state, RNG, errors
//! - `mcts`: Search tree, selection policies, transposition table, driver

pub mod core;
pub mod mcts;

// Re-export commonly used types
pub use crate::core::{
    GameError, GameRng, GameRngState, Outcome, PlayerId, StandardState, State, STANDARD_SIDE,
};

pub use crate::mcts::{
    FinalSelection, MCTSConfig, MCTSSearch, MCTSTree, SearchError, SearchOutcome, SearchStats,
    SearchWarning,
};
