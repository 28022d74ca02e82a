//! Command parser for the text game

use crate::board::Move;
use crate::search::Difficulty;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    /// `move c3-d4` or just `c3-d4`
    Move(Move),
    /// Screen-coordinate pick: first click selects a piece, second one moves it
    Click { x: i32, y: i32 },
    Moves,
    Board,
    Hint,
    New,
    Difficulty(Difficulty),
    Help,
    Quit,
    Unknown(String),
}

/// Parse one input line (simple tokenizer)
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Unknown(String::new());
    }

    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    match parts[0].to_ascii_lowercase().as_str() {
        "move" | "m" => match parts[1..].join(" ").parse::<Move>() {
            Ok(mv) => Command::Move(mv),
            Err(_) => Command::Unknown(trimmed.to_string()),
        },
        "click" => {
            let coords: Vec<i32> = parts[1..].iter().filter_map(|s| s.parse().ok()).collect();
            match coords[..] {
                [x, y] if parts.len() == 3 => Command::Click { x, y },
                _ => Command::Unknown(trimmed.to_string()),
            }
        }
        "moves" => Command::Moves,
        "board" | "show" => Command::Board,
        "hint" => Command::Hint,
        "new" => Command::New,
        "difficulty" | "level" => match parts.get(1).map(|s| s.parse::<Difficulty>()) {
            Some(Ok(level)) => Command::Difficulty(level),
            _ => Command::Unknown(trimmed.to_string()),
        },
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => match trimmed.parse::<Move>() {
            Ok(mv) => Command::Move(mv),
            Err(_) => Command::Unknown(trimmed.to_string()),
        },
    }
}
