//! Bit-packed five-in-a-row game state.
//!
//! ## Representation
//!
//! - `occupied`: every stone on the board, in all four line projections.
//! - `parity`: stone ownership relative to the player who just moved. After
//!   each move every occupied bit is XOR-folded into it, so the stones of the
//!   player who just moved read as set and the opponent's stones as clear.
//!   Reading back an absolute owner always goes through the current move
//!   parity.
//! - `empty`: remaining empty cells. Player 0 moves first on every board
//!   size, so the player to move is `(N * N - empty) % 2`.
//! - `winner`: decided only from the four lines through the last move.
//! - `hash`: Zobrist hash over (cell, owner), updated incrementally.
//!
//! A `State` is a plain value. Cloning copies the line arrays.
//!
//! ## Example
//!
//! ```
//! use gomoku_mcts::core::{Outcome, PlayerId, State};
//!
//! let mut state = State::<15>::new();
//! for x in 0..4 {
//!     state.play(x, 7).unwrap();   // player 0
//!     state.play(x, 0).unwrap();   // player 1
//! }
//! assert!(!state.terminal());
//!
//! state.play(4, 7).unwrap();
//! assert_eq!(state.outcome(), Some(Outcome::Win(PlayerId::FIRST)));
//! ```

use std::str::FromStr;

use super::error::GameError;
use super::lines::LineSet;
use super::player::{Outcome, PlayerId};
use super::zobrist::{ZobristKeys, MAX_SIDE};

/// Five-in-a-row position on an `N x N` board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State<const N: usize> {
    occupied: LineSet<N>,
    parity: LineSet<N>,
    last: u16,
    empty: u16,
    winner: Option<PlayerId>,
    hash: u64,
}

impl<const N: usize> Default for State<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> State<N> {
    /// Board side length.
    pub const SIDE: usize = N;

    /// Number of cells on the board.
    pub const CELLS: usize = N * N;

    const VALID_SIDE: () = assert!(N >= 5 && N <= MAX_SIDE, "board side must be in 5..=64");

    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_SIDE;
        Self {
            occupied: LineSet::new(),
            parity: LineSet::new(),
            last: 0,
            empty: Self::CELLS as u16,
            winner: None,
            hash: ZobristKeys::get().empty_board(Self::CELLS),
        }
    }

    /// Replay `(x, y)` moves from the empty board, alternating players.
    pub fn from_moves(moves: &[(usize, usize)]) -> Result<Self, GameError> {
        let mut state = Self::new();
        for &(x, y) in moves {
            state.play(x, y)?;
        }
        Ok(state)
    }

    /// Replay a position string such as `"7,7 8,7; 7,8"`.
    ///
    /// Tokens are `x,y` pairs separated by whitespace or `;`.
    pub fn from_position(position: &str) -> Result<Self, GameError> {
        let moves = position
            .split(|c: char| c.is_whitespace() || c == ';')
            .filter(|token| !token.is_empty())
            .map(parse_move)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_moves(&moves)
    }

    /// Cell index of `(x, y)`.
    #[inline]
    #[must_use]
    pub const fn index_of(x: usize, y: usize) -> u16 {
        (y * N + x) as u16
    }

    /// `(x, y)` of a cell index.
    #[inline]
    #[must_use]
    pub const fn coords_of(index: u16) -> (usize, usize) {
        let index = index as usize;
        (index % N, index / N)
    }

    /// Place the mover's stone on `index`.
    ///
    /// The cell must be on the board and empty and the game must not be
    /// over; this is the search hot path, so those preconditions are only
    /// debug-asserted. Use `try_action` or `play` for untrusted input.
    #[inline]
    pub fn action(&mut self, index: u16) {
        let (x, y) = Self::coords_of(index);
        debug_assert!((index as usize) < Self::CELLS);
        debug_assert!(!self.occupied.contains(x, y));
        debug_assert!(!self.terminal());

        let mover = self.to_move();

        self.occupied.set(x, y);
        self.parity.xor_assign(&self.occupied);
        self.empty -= 1;
        self.last = index;

        let keys = ZobristKeys::get();
        self.hash ^= keys.empty(index as usize) ^ keys.stone(index as usize, mover);

        self.winner = self.parity.five_through(x, y).then_some(mover);
    }

    /// Validated `action`.
    pub fn try_action(&mut self, index: usize) -> Result<(), GameError> {
        if index >= Self::CELLS {
            return Err(GameError::InvalidIndex {
                index,
                cells: Self::CELLS,
            });
        }
        if self.terminal() {
            return Err(GameError::GameOver);
        }
        let (x, y) = Self::coords_of(index as u16);
        if self.occupied.contains(x, y) {
            return Err(GameError::Occupied { x, y });
        }
        self.action(index as u16);
        Ok(())
    }

    /// Validated move by coordinates.
    pub fn play(&mut self, x: usize, y: usize) -> Result<(), GameError> {
        if x >= N || y >= N {
            return Err(GameError::OutOfBounds { x, y, size: N });
        }
        self.try_action(Self::index_of(x, y) as usize)
    }

    /// Indices of all empty cells, in row-major order.
    #[must_use]
    pub fn possible_actions(&self) -> Vec<u16> {
        let full_row = u64::MAX >> (64 - N);
        let mut actions = Vec::with_capacity(self.empty as usize);
        for y in 0..N {
            let mut free = !self.occupied.word(y) & full_row;
            while free != 0 {
                let x = free.trailing_zeros() as usize;
                actions.push(Self::index_of(x, y));
                free &= free - 1;
            }
        }
        actions
    }

    /// Is the game over (five in a row, or no empty cell left)?
    #[inline]
    #[must_use]
    pub fn terminal(&self) -> bool {
        self.empty == 0 || self.winner.is_some()
    }

    /// Result of a finished game, `None` while undecided.
    #[inline]
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self.winner {
            Some(player) => Some(Outcome::Win(player)),
            None if self.empty == 0 => Some(Outcome::Draw),
            None => None,
        }
    }

    /// The winner, if the last move made five in a row.
    #[inline]
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// The player whose move it is.
    #[inline]
    #[must_use]
    pub fn to_move(&self) -> PlayerId {
        PlayerId::new((self.moves_played() % 2) as u8)
    }

    /// The player who made the last move.
    #[inline]
    #[must_use]
    pub fn last_mover(&self) -> PlayerId {
        self.to_move().opponent()
    }

    /// Index of the last move (0 on an empty board).
    #[inline]
    #[must_use]
    pub fn last_action(&self) -> u16 {
        self.last
    }

    /// Remaining empty cells.
    #[inline]
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.empty as usize
    }

    /// Stones on the board.
    #[inline]
    #[must_use]
    pub fn moves_played(&self) -> usize {
        Self::CELLS - self.empty as usize
    }

    /// Position hash, used as transposition key.
    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Is `(x, y)` free? Coordinates must be on the board.
    #[inline]
    #[must_use]
    pub fn is_empty(&self, x: usize, y: usize) -> bool {
        !self.occupied.contains(x, y)
    }

    /// Owner of the stone on `(x, y)`, read back through the parity fold.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<PlayerId> {
        if x >= N || y >= N || !self.occupied.contains(x, y) {
            return None;
        }
        if self.parity.contains(x, y) {
            Some(self.last_mover())
        } else {
            Some(self.to_move())
        }
    }

    /// Same stones with the same owners, regardless of move order.
    #[must_use]
    pub fn same_position(&self, other: &Self) -> bool {
        self.empty == other.empty
            && self.occupied == other.occupied
            && self.parity == other.parity
    }
}

impl<const N: usize> FromStr for State<N> {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_position(s)
    }
}

fn parse_move(token: &str) -> Result<(usize, usize), GameError> {
    let malformed = || GameError::MalformedPosition(format!("expected `x,y`, got `{}`", token));
    let (x, y) = token.split_once(',').ok_or_else(malformed)?;
    let x = x.trim().parse().map_err(|_| malformed())?;
    let y = y.trim().parse().map_err(|_| malformed())?;
    Ok((x, y))
}
