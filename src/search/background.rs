//! Computer move search on a worker thread
//!
//! The worker owns the `Ai` and a copy of the board for the duration of the
//! search and hands the `Ai` back on `join`. `stop` raises the search's stop
//! flag; the search then returns the best fully evaluated root move.

use crate::ai::Ai;
use crate::board::{Board, Move};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub struct BackgroundSearch {
    handle: thread::JoinHandle<(Ai, Option<Move>)>,
    stop_flag: Arc<AtomicBool>,
    done: Arc<AtomicBool>,
}

impl BackgroundSearch {
    pub fn spawn(board: &Board, mut ai: Ai) -> Self {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let done = Arc::new(AtomicBool::new(false));
        ai.set_stop_flag(Some(stop_flag.clone()));

        let board = board.clone();
        let done_clone = done.clone();
        let handle = thread::spawn(move || {
            let mv = ai.get_best_move(&board);
            ai.set_stop_flag(None);
            done_clone.store(true, Ordering::Release);
            (ai, mv)
        });

        Self {
            handle,
            stop_flag,
            done,
        }
    }

    /// Ask the running search to finish early
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Poll until the search finishes or `timeout` elapses.
    /// Returns whether it finished.
    pub fn wait(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        while !self.is_finished() {
            if start.elapsed() > timeout {
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
        true
    }

    /// Block for the result. A panic on the worker is re-raised here.
    pub fn join(self) -> (Ai, Option<Move>) {
        match self.handle.join() {
            Ok(result) => result,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Side;
    use crate::search::SearchParams;

    #[test]
    fn background_search_smoke() {
        let ai = Ai::with_params(Side::Computer, SearchParams::new().max_depth(2).seed(5));
        let board = Board::new();
        let job = BackgroundSearch::spawn(&board, ai);
        assert!(job.wait(Duration::from_secs(30)));
        let (ai, mv) = job.join();
        let mv = mv.expect("start position has moves");
        assert_eq!(board.piece_at(mv.from).map(|p| p.owner), Some(Side::Computer));
        assert_eq!(ai.side(), Side::Computer);
    }

    #[test]
    fn stopped_search_still_returns_a_move() {
        let ai = Ai::with_params(Side::Computer, SearchParams::new().max_depth(40).seed(5));
        let board = Board::new();
        let job = BackgroundSearch::spawn(&board, ai);
        job.stop();
        let (_, mv) = job.join();
        assert!(mv.is_some());
    }
}
