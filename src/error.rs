//! Error types for board operations
//!
//! Only recoverable conditions live here. A side without legal moves is a
//! game result (see [`crate::board::GameStatus`]), not an error.

use crate::board::{Move, Side, Square};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Move violates the movement or capture rules
    #[error("invalid move {mv}: {reason}")]
    InvalidMove { mv: Move, reason: &'static str },

    #[error("no piece on {0}")]
    EmptyOrigin(Square),

    #[error("piece on {square} does not belong to {side:?}")]
    NotYourPiece { square: Square, side: Side },

    #[error("square {0} is off the board")]
    OffBoard(Square),

    /// Malformed board layout text
    #[error("layout error: {0}")]
    Layout(String),

    /// Malformed square or move notation
    #[error("parse error: {0}")]
    Parse(String),
}

pub type GameResult<T> = Result<T, GameError>;
