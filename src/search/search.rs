//! Main search engine implementation
//!
//! Depth-limited minimax with alpha-beta pruning and a transposition table.
//! The engine maximizes for its own side; whether a node is a maximizing or
//! minimizing ply follows that node's side to move, so a multi-jump
//! continuation keeps the same kind of ply. Each decision works on a private
//! copy of the board using make/undo, never on the caller's board.

use super::params::SearchParams;
use super::stats::SearchStats;
use super::tt::{Bound, TranspositionTable, TtEntry};
use crate::board::{Board, Move, Side};
use crate::eval::{self, Score};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const INFINITE: Score = f64::INFINITY;

/// Outcome of one decision
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// None only when the side has no legal move
    pub best: Option<Move>,
    pub score: Score,
    pub depth: u8,
    /// False when a time limit or stop request cut the root loop short
    pub completed: bool,
}

/// Copy of `board` with the turn given to `side`
pub fn root_position(board: &Board, side: Side) -> Board {
    let mut node = board.clone();
    if node.side_to_move() != side {
        debug!("search: handing the turn to {:?}", side);
        node.set_side_to_move(side);
    }
    node
}

/// Ordering class: captures, then promotions, then everything else
pub fn move_priority(board: &Board, mv: &Move) -> u8 {
    if mv.is_capture() {
        return 0;
    }
    match board.piece_at(mv.from) {
        Some(p) if !p.king && mv.to.row == p.owner.promotion_row() => 1,
        _ => 2,
    }
}

/// Main search engine
pub struct Search {
    /// The maximizing side
    side: Side,

    tt: TranspositionTable,

    params: SearchParams,

    stats: SearchStats,

    /// Tie shuffling, leaf jitter and the random strategies
    rng: StdRng,

    stop_flag: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
    aborted: bool,
}

impl Search {
    pub fn new(side: Side, params: SearchParams) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            side,
            tt: TranspositionTable::new(),
            params,
            stats: SearchStats::new(),
            rng,
            stop_flag: None,
            deadline: None,
            aborted: false,
        }
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    pub fn set_stop_flag(&mut self, flag: Option<Arc<AtomicBool>>) {
        self.stop_flag = flag;
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SearchParams) {
        if let Some(seed) = params.seed {
            if self.params.seed != Some(seed) {
                self.rng = StdRng::seed_from_u64(seed);
            }
        }
        self.params = params;
        self.clear_tt();
    }

    /// Get search statistics
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Forget every stored score, e.g. when a new game starts
    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Choose a move for the engine's side at the configured depth.
    ///
    /// If it is not the engine's turn on `board`, the search runs on a copy
    /// where the engine is to move.
    pub fn search(&mut self, board: &Board) -> SearchResult {
        let depth = self.params.max_depth.max(1);

        self.stats.reset();
        self.stats.start_timing();
        self.aborted = false;
        self.deadline = (self.params.time_limit_ms > 0)
            .then(|| Instant::now() + Duration::from_millis(self.params.time_limit_ms));
        if !self.params.keep_tt {
            self.clear_tt();
        }

        let mut root = root_position(board, self.side);
        let moves = root.get_all_valid_moves(self.side);
        if moves.is_empty() {
            debug!("search: {:?} has no legal move", self.side);
            self.stats.update_timing();
            return SearchResult {
                best: None,
                score: -eval::WIN_SCORE,
                depth,
                completed: true,
            };
        }
        debug!("search: {} candidate moves at depth {}", moves.len(), depth);
        let moves = self.order_moves(&root, moves);

        let mut best_move = None;
        let mut best_score = -INFINITE;
        let mut alpha = -INFINITE;
        for &mv in &moves {
            let undo = root.make_move(mv);
            let score = self.minimax(&mut root, depth - 1, alpha, INFINITE);
            root.undo_move(undo);
            if self.aborted {
                break;
            }
            self.stats.root_moves += 1;

            // strict: the first of equal candidates stays
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(best_score);
        }

        let completed = !self.aborted;
        if best_move.is_none() {
            // interrupted before any candidate finished
            best_move = moves.first().copied();
        }

        self.stats.update_timing();
        self.stats.log_summary();
        if let Some(mv) = best_move {
            debug!(
                "search: chose {} score {:.3} ({} of {} candidates)",
                mv,
                best_score,
                self.stats.root_moves,
                moves.len()
            );
        }

        SearchResult {
            best: best_move,
            score: best_score,
            depth,
            completed,
        }
    }

    /// Fail-soft alpha-beta minimax. Returns the exact value when it lies
    /// strictly inside `(alpha, beta)`, otherwise a bound on the far side.
    pub fn minimax(&mut self, node: &mut Board, depth: u8, mut alpha: Score, mut beta: Score) -> Score {
        if self.should_stop() {
            return 0.0;
        }
        self.stats.nodes += 1;

        let key = node.hash();
        if let Some(entry) = self.tt.probe(key, depth) {
            if let Some(score) = entry.cutoff(alpha, beta) {
                self.stats.tt_hits += 1;
                return score;
            }
        }

        if depth == 0 || node.is_game_over() {
            let score = self.leaf_score(node);
            self.remember(key, depth, TtEntry::exact(score));
            return score;
        }

        let to_move = node.side_to_move();
        let maximizing = to_move == self.side;
        let moves = node.get_all_valid_moves(to_move);
        let moves = self.order_moves(node, moves);

        let (alpha0, beta0) = (alpha, beta);
        let mut best = if maximizing { -INFINITE } else { INFINITE };
        for mv in moves {
            let undo = node.make_move(mv);
            let score = self.minimax(node, depth - 1, alpha, beta);
            node.undo_move(undo);
            if self.aborted {
                return 0.0;
            }

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            if beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        let bound = if best <= alpha0 {
            Bound::Upper
        } else if best >= beta0 {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.remember(key, depth, TtEntry { score: best, bound });
        best
    }

    /// Captures first, then promotions, then quiet moves. Equal classes are
    /// shuffled when `shuffle_ties` is on, otherwise kept in generation order.
    pub fn order_moves(&mut self, board: &Board, mut moves: Vec<Move>) -> Vec<Move> {
        if self.params.shuffle_ties {
            moves.shuffle(&mut self.rng);
        }
        moves.sort_by_key(|mv| move_priority(board, mv));
        moves
    }

    fn leaf_score(&mut self, node: &Board) -> Score {
        self.stats.leaves += 1;
        let score = eval::evaluate(node, self.side, &self.params.weights);
        if self.params.jitter > 0.0 {
            let j = self.params.jitter;
            score + self.rng.gen_range(-j..=j)
        } else {
            score
        }
    }

    fn remember(&mut self, key: u64, depth: u8, entry: TtEntry) {
        if !self.aborted && self.tt.store(key, depth, entry) {
            self.stats.tt_stores += 1;
        }
    }

    fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if let Some(flag) = &self.stop_flag {
            if flag.load(Ordering::Relaxed) {
                self.aborted = true;
            }
        }
        if let Some(deadline) = self.deadline {
            if self.stats.nodes & 255 == 0 && Instant::now() >= deadline {
                debug!("search: time limit reached after {} nodes", self.stats.nodes);
                self.aborted = true;
            }
        }
        self.aborted
    }
}
