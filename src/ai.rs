//! The computer opponent

use crate::board::{Board, Move, Side};
use crate::search::search::root_position;
use crate::search::{Difficulty, Search, SearchParams, Strategy};
use log::debug;
use rand::seq::SliceRandom;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub struct Ai {
    difficulty: Option<Difficulty>,
    search: Search,
}

impl Ai {
    pub fn new(side: Side, difficulty: Difficulty) -> Self {
        let mut ai = Self::with_params(side, difficulty.params());
        ai.difficulty = Some(difficulty);
        ai
    }

    /// Custom parameters, no named difficulty
    pub fn with_params(side: Side, params: SearchParams) -> Self {
        Self {
            difficulty: None,
            search: Search::new(side, params),
        }
    }

    pub fn side(&self) -> Side {
        self.search.side()
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Switch presets, keeping the seed and time limit already configured
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        let params = self.search.params().clone().with_difficulty(difficulty);
        self.search.set_params(params);
        self.difficulty = Some(difficulty);
    }

    pub fn clear_tt(&mut self) {
        self.search.clear_tt();
    }

    pub fn params(&self) -> &SearchParams {
        self.search.params()
    }

    pub fn search(&self) -> &Search {
        &self.search
    }

    pub fn set_stop_flag(&mut self, flag: Option<Arc<AtomicBool>>) {
        self.search.set_stop_flag(flag);
    }

    /// A legal move for this side on `board`, or None when it has none.
    /// The board is not modified.
    pub fn get_best_move(&mut self, board: &Board) -> Option<Move> {
        let side = self.side();
        match self.search.params().strategy {
            Strategy::Minimax => self.search.search(board).best,
            Strategy::Random => {
                let moves = root_position(board, side).get_all_valid_moves(side);
                debug!("ai: {} valid moves, picking at random", moves.len());
                moves.choose(self.search.rng_mut()).copied()
            }
            Strategy::CapturePreferring => {
                let moves = root_position(board, side).get_all_valid_moves(side);
                let captures: Vec<Move> = moves.iter().copied().filter(Move::is_capture).collect();
                debug!("ai: {} valid moves, {} captures", moves.len(), captures.len());
                let pool = if captures.is_empty() { &moves } else { &captures };
                pool.choose(self.search.rng_mut()).copied()
            }
        }
    }
}
