//! Transposition table: memoized search scores keyed by position and depth
//!
//! The position key is the board's Zobrist hash, which covers side to move
//! and any pending multi-jump. The remaining depth is part of the key so a
//! shallow score never answers a deeper query. The first score stored for a
//! key is kept for the lifetime of the table.

use crate::eval::Score;
use std::collections::hash_map::{Entry, HashMap};

/// How a stored score relates to the true minimax value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// True value is at least `score` (the node failed high)
    Lower,
    /// True value is at most `score` (the node failed low)
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TtEntry {
    pub score: Score,
    pub bound: Bound,
}

impl TtEntry {
    pub fn exact(score: Score) -> Self {
        Self {
            score,
            bound: Bound::Exact,
        }
    }

    /// The stored score, if it settles a node searched with `(alpha, beta)`
    pub fn cutoff(&self, alpha: Score, beta: Score) -> Option<Score> {
        match self.bound {
            Bound::Exact => Some(self.score),
            Bound::Lower if self.score >= beta => Some(self.score),
            Bound::Upper if self.score <= alpha => Some(self.score),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: HashMap<(u64, u8), TtEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probe(&self, key: u64, depth: u8) -> Option<TtEntry> {
        self.entries.get(&(key, depth)).copied()
    }

    /// Returns false when the key already had an entry (which is left as is)
    pub fn store(&mut self, key: u64, depth: u8, entry: TtEntry) -> bool {
        match self.entries.entry((key, depth)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tt_basic_store_probe() {
        let mut tt = TranspositionTable::new();
        assert!(tt.store(0x1111, 3, TtEntry::exact(42.0)));

        let entry = tt.probe(0x1111, 3).expect("Entry should exist");
        assert_eq!(entry.score, 42.0);
        assert_eq!(entry.bound, Bound::Exact);

        assert!(tt.probe(0x9999, 3).is_none());
        // same position, other depth
        assert!(tt.probe(0x1111, 2).is_none());
    }

    #[test]
    fn test_tt_first_write_wins() {
        let mut tt = TranspositionTable::new();
        tt.store(0x5678, 2, TtEntry::exact(1.5));
        assert!(!tt.store(0x5678, 2, TtEntry::exact(-7.0)));
        assert_eq!(tt.probe(0x5678, 2).map(|e| e.score), Some(1.5));
        assert_eq!(tt.len(), 1);

        tt.clear();
        assert!(tt.is_empty());
        assert!(tt.store(0x5678, 2, TtEntry::exact(-7.0)));
    }

    #[test]
    fn test_tt_bounds_only_cut_outside_window() {
        let lower = TtEntry {
            score: 5.0,
            bound: Bound::Lower,
        };
        assert_eq!(lower.cutoff(0.0, 4.0), Some(5.0));
        assert_eq!(lower.cutoff(0.0, 6.0), None);

        let upper = TtEntry {
            score: -2.0,
            bound: Bound::Upper,
        };
        assert_eq!(upper.cutoff(-1.0, 3.0), Some(-2.0));
        assert_eq!(upper.cutoff(-3.0, 3.0), None);

        assert_eq!(TtEntry::exact(0.5).cutoff(1.0, 2.0), Some(0.5));
    }
}
