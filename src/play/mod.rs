//! Text front end: command parsing and the game session

pub mod parser;
pub mod session;

pub use parser::{parse_command, Command};
pub use session::{process_line, run_play_loop, run_play_loop_with, Game, GameConfig};
