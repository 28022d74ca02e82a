//! Move search for the computer player
//!
//! Minimax with alpha-beta pruning over a transposition table, plus the
//! parameters, difficulty presets and statistics that go with it.

pub mod background;
pub mod params;
pub mod search;
pub mod stats;
pub mod tt;

pub use self::background::BackgroundSearch;
pub use self::params::{Difficulty, SearchParams, Strategy};
pub use self::search::{Search, SearchResult};
pub use self::stats::SearchStats;
pub use self::tt::TranspositionTable;
