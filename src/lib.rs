pub mod ai;
pub mod board;
pub mod error;
pub mod eval;
pub mod play;
pub mod search;
pub mod utils;
pub mod zobrist;

pub use ai::Ai;
pub use board::{Board, CaptureRule, GameStatus, Move, Piece, Side, Square};
pub use error::{GameError, GameResult};
