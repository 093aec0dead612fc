//! Player identification and game outcomes.
//!
//! ## PlayerId
//!
//! Five-in-a-row is strictly two-player. `PlayerId::FIRST` always makes the
//! opening move, whatever the board size.
//!
//! ## Outcome
//!
//! A finished game is either a win for one player or a draw (full board).
//! Each outcome maps onto one slot of the three outcome counters kept by
//! the search statistics.

use serde::{Deserialize, Serialize};

/// Player identifier (0 or 1).
///
/// Player indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// The player who moves first.
    pub const FIRST: PlayerId = PlayerId(0);

    /// The player who moves second.
    pub const SECOND: PlayerId = PlayerId(1);

    /// Create a new player ID.
    ///
    /// Only the lowest bit is kept, so any value maps onto one of the two
    /// players.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id & 1)
    }

    /// Get the raw player index (0-based).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other player.
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Iterate over both players.
    ///
    /// ```
    /// use gomoku_mcts::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::both().collect();
    /// assert_eq!(players, vec![PlayerId::FIRST, PlayerId::SECOND]);
    /// ```
    pub fn both() -> impl Iterator<Item = PlayerId> {
        [Self::FIRST, Self::SECOND].into_iter()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Five (or more) in a row for this player.
    Win(PlayerId),
    /// The board filled up without a winner.
    Draw,
}

impl Outcome {
    /// Number of distinct outcome slots.
    pub const COUNT: usize = 3;

    /// Slot in a `[u32; 3]` outcome counter: 0 and 1 are wins for the
    /// respective player, 2 is a draw.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Outcome::Win(player) => player.index(),
            Outcome::Draw => 2,
        }
    }

    /// The winning player, if any.
    #[must_use]
    pub const fn winner(self) -> Option<PlayerId> {
        match self {
            Outcome::Win(player) => Some(player),
            Outcome::Draw => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win(player) => write!(f, "{} wins", player),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}
