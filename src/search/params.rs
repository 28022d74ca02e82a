//! Search parameters and configuration
//!
//! Controls how the computer picks a move: which strategy, how deep to
//! search, how much randomness to inject, and the evaluation weights.

use crate::eval::EvalWeights;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a move is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Uniform among all legal moves
    Random,
    /// Uniform among captures if there are any, else among all moves
    CapturePreferring,
    /// Depth-limited minimax with alpha-beta pruning
    Minimax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn params(self) -> SearchParams {
        match self {
            Difficulty::Easy => SearchParams::new()
                .strategy(Strategy::CapturePreferring)
                .max_depth(0),
            Difficulty::Medium => SearchParams::new().max_depth(2).jitter(0.25),
            Difficulty::Hard => SearchParams::new().max_depth(4),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Difficulty as clap::ValueEnum>::from_str(s.trim(), true)
    }
}

/// Search parameters for the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub strategy: Strategy,

    /// Maximum search depth in plies
    pub max_depth: u8,

    /// Time limit in milliseconds (0 = unlimited)
    pub time_limit_ms: u64,

    /// Amplitude of the uniform noise added to leaf scores (0 = deterministic)
    pub jitter: f64,

    /// Randomize the order of moves with equal ordering priority
    pub shuffle_ties: bool,

    /// Keep the transposition table between decisions
    pub keep_tt: bool,

    pub weights: EvalWeights,

    /// RNG seed for reproducible games
    pub seed: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            strategy: Strategy::Minimax,
            max_depth: 4,
            time_limit_ms: 0,
            jitter: 0.0,
            shuffle_ties: true,
            keep_tt: false,
            weights: EvalWeights::default(),
            seed: None,
        }
    }
}

impl SearchParams {
    /// Create new search params with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set maximum depth in plies
    pub fn max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set time limit in milliseconds
    pub fn time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn jitter(mut self, amplitude: f64) -> Self {
        self.jitter = amplitude.abs();
        self
    }

    pub fn shuffle_ties(mut self, enable: bool) -> Self {
        self.shuffle_ties = enable;
        self
    }

    pub fn keep_tt(mut self, keep: bool) -> Self {
        self.keep_tt = keep;
        self
    }

    pub fn weights(mut self, weights: EvalWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the playing strength with a preset, keeping seed, time limit
    /// and weights
    pub fn with_difficulty(self, difficulty: Difficulty) -> Self {
        let mut params = difficulty.params();
        params.seed = self.seed;
        params.time_limit_ms = self.time_limit_ms;
        params.weights = self.weights;
        params
    }
}
