//! Static evaluation
//!
//! Scores are from a fixed perspective (the searching side): positive is
//! good for `perspective`. The evaluator is pure; random jitter is added by
//! the search when configured.

use crate::board::{Board, Piece, Side};
use serde::{Deserialize, Serialize};

pub type Score = f64;

/// Score of a won position, well above any material total
pub const WIN_SCORE: Score = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    pub man: f64,
    pub king: f64,
    /// Bonus per piece on the central 4x4 block
    pub center: f64,
    /// Per legal move of difference between the two sides
    pub mobility: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            man: 1.0,
            king: 3.0,
            center: 0.1,
            mobility: 0.05,
        }
    }
}

fn in_center(piece: &Piece) -> bool {
    (2..=5).contains(&piece.row) && (2..=5).contains(&piece.col)
}

/// Material plus centre occupancy, signed toward `perspective`
pub fn material_balance(board: &Board, perspective: Side, weights: &EvalWeights) -> Score {
    board
        .all_pieces()
        .map(|p| {
            let mut value = if p.king { weights.king } else { weights.man };
            if in_center(p) {
                value += weights.center;
            }
            if p.owner == perspective {
                value
            } else {
                -value
            }
        })
        .sum()
}

pub fn evaluate(board: &Board, perspective: Side, weights: &EvalWeights) -> Score {
    let to_move = board.side_to_move();
    let to_move_count = board.get_all_valid_moves(to_move).len();
    let other_count = board.get_all_valid_moves(to_move.opponent()).len();

    // Same precedence as Board::check_winner
    let loser = if to_move_count == 0 {
        Some(to_move)
    } else if other_count == 0 {
        Some(to_move.opponent())
    } else {
        None
    };
    if let Some(loser) = loser {
        return if loser == perspective {
            -WIN_SCORE
        } else {
            WIN_SCORE
        };
    }

    let (own, theirs) = if to_move == perspective {
        (to_move_count, other_count)
    } else {
        (other_count, to_move_count)
    };
    let mobility = (own as f64 - theirs as f64) * weights.mobility;

    material_balance(board, perspective, weights) + mobility
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_is_balanced() {
        let board = Board::new();
        let w = EvalWeights::default();
        assert!(evaluate(&board, Side::Computer, &w).abs() < 1e-9);
        assert!(evaluate(&board, Side::Human, &w).abs() < 1e-9);
    }

    #[test]
    fn perspective_flips_sign() {
        let board = Board::from_layout(
            "
            . c . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            h . H . . . . .",
            Side::Human,
        )
        .unwrap();
        let w = EvalWeights::default();
        let a = evaluate(&board, Side::Computer, &w);
        let b = evaluate(&board, Side::Human, &w);
        assert_eq!(a, -b);
        assert!(b > 0.0);
    }
}
