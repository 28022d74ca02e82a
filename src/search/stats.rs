//! Search statistics and performance metrics
//!
//! Tracks nodes searched, leaf evaluations, cache traffic, cutoffs
//! and timing for one decision.

use log::debug;
use std::time::{Duration, Instant};

/// Search statistics
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    /// Total nodes visited by minimax
    pub nodes: u64,

    /// Root candidates fully evaluated
    pub root_moves: u64,

    /// Static evaluations performed
    pub leaves: u64,

    /// Transposition table hits that settled a node
    pub tt_hits: u64,

    /// Transposition table entries written
    pub tt_stores: u64,

    /// Alpha-beta cutoffs
    pub cutoffs: u64,

    /// Search start time
    pub start_time: Option<Instant>,

    /// Time spent searching
    pub search_time: Duration,
}

impl SearchStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing
    pub fn start_timing(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn update_timing(&mut self) {
        if let Some(start) = self.start_time {
            self.search_time = start.elapsed();
        }
    }

    /// Nodes per second over the last search
    pub fn nps(&self) -> u64 {
        let elapsed_ms = self.search_time.as_millis() as u64;
        if elapsed_ms > 0 {
            (self.nodes * 1000) / elapsed_ms
        } else {
            0
        }
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn log_summary(&self) {
        debug!(
            "search: nodes={} root_moves={} leaves={} tt_hits={} tt_stores={} cutoffs={} time={}ms nps={}",
            self.nodes,
            self.root_moves,
            self.leaves,
            self.tt_hits,
            self.tt_stores,
            self.cutoffs,
            self.search_time.as_millis(),
            self.nps()
        );
    }
}
