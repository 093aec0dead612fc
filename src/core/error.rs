//! Errors for rejected moves and positions.

use thiserror::Error;

/// A move or position that cannot be applied to a `State`.
///
/// Every operation returning this error leaves the state untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cell ({x}, {y}) is outside the {size}x{size} board")]
    OutOfBounds { x: usize, y: usize, size: usize },

    #[error("cell index {index} is outside a board of {cells} cells")]
    InvalidIndex { index: usize, cells: usize },

    #[error("cell ({x}, {y}) is already occupied")]
    Occupied { x: usize, y: usize },

    #[error("the game is already over")]
    GameOver,

    #[error("malformed position: {0}")]
    MalformedPosition(String),
}
