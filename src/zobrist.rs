// Zobrist hashing with precomputed tables
use crate::board::{Board, Piece};

/// Key tables, generated at compile time
pub struct ZobristKeys {
    /// [owner * 2 + king][square]
    pub piece: [[u64; 64]; 4],
    pub side: u64,
    /// Square of a piece that must continue a multi-jump
    pub pending: [u64; 64],
}

pub static KEYS: ZobristKeys = generate();

const fn split_mix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

const fn generate() -> ZobristKeys {
    let mut piece = [[0u64; 64]; 4];
    let mut pending = [0u64; 64];
    let mut i = 0;
    while i < 4 {
        let mut j = 0;
        while j < 64 {
            piece[i][j] =
                split_mix64((i as u64).wrapping_mul(0xad3).wrapping_add((j as u64).wrapping_mul(0x47a1)));
            j += 1;
        }
        i += 1;
    }
    let mut j = 0;
    while j < 64 {
        pending[j] = split_mix64(0x1000_0000u64.wrapping_add((j as u64).wrapping_mul(0x3333_5555)));
        j += 1;
    }
    ZobristKeys {
        piece,
        side: split_mix64(0xdeadbeefdeadbeef),
        pending,
    }
}

#[inline]
pub fn piece_key(piece: &Piece) -> u64 {
    let kind = (piece.owner as usize) * 2 + piece.king as usize;
    KEYS.piece[kind][piece.square().index()]
}

/// Full recomputation; `Board` keeps the same value incrementally.
pub fn recalc_zobrist_full(board: &Board) -> u64 {
    let mut h = 0u64;
    for piece in board.all_pieces() {
        h ^= piece_key(piece);
    }
    if board.side_to_move() == crate::board::Side::Human {
        h ^= KEYS.side;
    }
    if let Some(sq) = board.pending_jump() {
        h ^= KEYS.pending[sq.index()];
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_distinct() {
        let mut seen = HashSet::new();
        for table in KEYS.piece.iter() {
            for &k in table.iter() {
                assert!(seen.insert(k));
            }
        }
        for &k in KEYS.pending.iter() {
            assert!(seen.insert(k));
        }
        assert!(seen.insert(KEYS.side));
    }
}
