use damista::board::{Board, CaptureRule, Side};

#[test]
fn perft_regression_starting_pos() {
    let mut board = Board::new();
    let expected = [7u64, 49, 302];

    for (i, &nodes) in expected.iter().enumerate() {
        let depth = i as u8 + 1;
        let got = board.perft(depth);
        assert_eq!(got, nodes, "perft mismatch at depth {}: got {} expected {}", depth, got, nodes);
    }
    // make/undo left nothing behind
    assert_eq!(board, Board::new());
    assert_eq!(board.hash(), board.recalc_zobrist());
}

#[test]
fn perft_divide_sums_to_perft() {
    let mut board = Board::new();
    let divide = board.perft_divide(3);
    assert_eq!(divide.len(), 7);
    let total: u64 = divide.iter().map(|(_, n)| n).sum();
    assert_eq!(total, board.perft(3));
}

#[test]
fn perft_depth_zero_is_one() {
    let mut board = Board::new();
    assert_eq!(board.perft(0), 1);
}

#[test]
fn free_captures_never_shrink_the_tree() {
    let mut forced = Board::new();
    let mut free = Board::new().with_capture_rule(CaptureRule::Free);
    for depth in 1..=4 {
        assert!(free.perft(depth) >= forced.perft(depth), "depth {}", depth);
    }
}

#[test]
fn both_sides_have_seven_opening_moves() {
    let board = Board::new();
    assert_eq!(board.get_all_valid_moves(Side::Human).len(), 7);
    assert_eq!(board.get_all_valid_moves(Side::Computer).len(), 7);
}
