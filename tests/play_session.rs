//! Integration tests for the text game session

use damista::board::{Board, Move, Side};
use damista::play::{process_line, run_play_loop_with, Game, GameConfig};
use damista::search::{Difficulty, SearchParams};
use std::io::Cursor;

fn quick_config() -> GameConfig {
    GameConfig {
        difficulty: Some(Difficulty::Easy),
        params: SearchParams::new().seed(1),
        ..GameConfig::default()
    }
}

#[test]
fn test_help_and_board() {
    let mut game = Game::new(quick_config());
    let help = process_line("help", &mut game);
    assert_eq!(help[0], "commands:");

    let board = process_line("board", &mut game);
    assert_eq!(board.len(), 9);
    assert_eq!(board[8], "   a b c d e f g h");
}

#[test]
fn test_legal_move_gets_a_reply() {
    let mut game = Game::new(quick_config());
    let res = process_line("c3-d4", &mut game);
    assert_eq!(res[0], "you play c3-d4");
    assert!(res.iter().any(|l| l.starts_with("computer plays")));
    assert_eq!(game.board().side_to_move(), Side::Human);
    assert_eq!(game.board().piece_count(Side::Human), 12);
}

#[test]
fn test_illegal_move_is_rejected() {
    let mut game = Game::new(quick_config());
    let res = process_line("c3-c4", &mut game);
    assert_eq!(res.len(), 1);
    assert!(res[0].starts_with("illegal move"));
    assert_eq!(*game.board(), Board::new());

    let res = process_line("d6-e5", &mut game);
    assert!(res[0].starts_with("illegal move"));
    assert_eq!(*game.board(), Board::new());
}

#[test]
fn test_click_to_move() {
    let mut game = Game::new(quick_config());
    // default layout: 80 px cells, board corner at (320, 40)
    let res = process_line("click 0 0", &mut game);
    assert_eq!(res, vec!["click is outside the board".to_string()]);

    let res = process_line("click 330 50", &mut game);
    assert_eq!(res, vec!["no piece of yours on a8".to_string()]);

    let res = process_line("click 490 450", &mut game);
    assert_eq!(res, vec!["selected c3".to_string()]);

    let res = process_line("click 570 370", &mut game);
    assert_eq!(res[0], "you play c3-d4");
}

#[test]
fn test_moves_and_hint() {
    let mut game = Game::new(quick_config());
    let res = process_line("moves", &mut game);
    assert_eq!(res[0].split_whitespace().count(), 7);

    let res = process_line("hint", &mut game);
    let hint: Move = res[0].trim_start_matches("hint: ").parse().unwrap();
    assert!(game.board().is_legal(hint));
}

#[test]
fn test_difficulty_and_quit() {
    let mut game = Game::new(quick_config());
    assert_eq!(game.ai().difficulty(), Some(Difficulty::Easy));
    let res = process_line("difficulty hard", &mut game);
    assert_eq!(res, vec!["difficulty set to hard".to_string()]);
    assert_eq!(game.ai().difficulty(), Some(Difficulty::Hard));
    assert_eq!(game.ai().params().seed, Some(1));

    assert!(game.is_running());
    assert!(process_line("quit", &mut game).is_empty());
    assert!(!game.is_running());
}

#[test]
fn test_multi_jump_waits_for_the_human() {
    let board = Board::from_layout(
        "
        . c . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . c . . .
        . . . . . . . .
        . . c . . . . .
        . h . . . . . h
        . . . . . . . .",
        Side::Human,
    )
    .unwrap();
    let mut game = Game::from_board(quick_config(), board);

    let res = process_line("b2xd4", &mut game);
    assert!(res.contains(&"keep jumping with d4".to_string()));
    assert!(!res.iter().any(|l| l.starts_with("computer plays")));

    let res = process_line("d4xf6", &mut game);
    assert!(res.iter().any(|l| l.starts_with("computer plays")));
    assert_eq!(game.board().piece_count(Side::Computer), 1);
}

#[test]
fn test_game_over_is_reported() {
    // the only computer piece gets captured
    let board = Board::from_layout(
        "
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . c . . . .
        . . h . . . . .
        . . . . . . . .
        . . . . . . . .",
        Side::Human,
    )
    .unwrap();
    let mut game = Game::from_board(quick_config(), board);
    let res = process_line("c3xe5", &mut game);
    assert_eq!(res.last().map(String::as_str), Some("game over: you win"));

    let res = process_line("e5-d6", &mut game);
    assert!(res[0].starts_with("the game is over"));

    let res = process_line("hint", &mut game);
    assert_eq!(res, vec!["no hint available".to_string()]);
}

#[test]
fn test_new_game_resets() {
    let mut game = Game::new(quick_config());
    process_line("c3-d4", &mut game);
    assert_ne!(*game.board(), Board::new());
    process_line("new", &mut game);
    assert_eq!(*game.board(), Board::new());
}

#[test]
fn test_new_game_forgets_kept_scores() {
    let config = GameConfig {
        difficulty: None,
        params: SearchParams::new().max_depth(2).keep_tt(true).seed(5),
        ..GameConfig::default()
    };
    let mut game = Game::new(config);
    process_line("c3-d4", &mut game);
    assert!(!game.ai().search().tt().is_empty());

    process_line("new", &mut game);
    assert!(game.ai().search().tt().is_empty());
}

#[test]
fn test_run_loop_over_streams() {
    let input = Cursor::new("c3-d4\n\nbogus\nquit\nc3-d4\n");
    let mut output = Vec::new();
    run_play_loop_with(quick_config(), input, &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("you play c3-d4"));
    assert!(text.contains("unknown command: bogus"));
    // nothing is read after quit
    assert_eq!(text.matches("you play").count(), 1);
}
