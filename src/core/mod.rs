//! Core game types: players, bit-packed state, hashing, RNG, errors.
//!
//! This module knows nothing about search. `State` is the only type the
//! search mutates; everything else here supports it.

pub mod error;
pub mod lines;
pub mod player;
pub mod rng;
pub mod state;
pub mod zobrist;

pub use error::GameError;
pub use lines::{has_five, has_five_naive, LineSet};
pub use player::{Outcome, PlayerId};
pub use rng::{GameRng, GameRngState};
pub use state::State;
pub use zobrist::{ZobristKeys, MAX_SIDE};

/// Standard 15x15 board.
pub const STANDARD_SIDE: usize = 15;

/// State on the standard 15x15 board.
pub type StandardState = State<STANDARD_SIDE>;
