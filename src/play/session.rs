//! Text game session: the human plays against the computer over stdin/stdout

use super::parser::{parse_command, Command};
use crate::ai::Ai;
use crate::board::{Board, CaptureRule, GameStatus, Move, Side, Square};
use crate::search::{Difficulty, SearchParams};
use crate::utils::ScreenLayout;
use log::{info, warn};
use std::io::{self, BufRead, Write};

/// Everything needed to start a game
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Named preset; when None, `params` is used as given
    pub difficulty: Option<Difficulty>,
    pub params: SearchParams,
    pub capture_rule: CaptureRule,
    pub layout: ScreenLayout,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Some(Difficulty::Medium),
            params: Difficulty::Medium.params(),
            capture_rule: CaptureRule::Forced,
            layout: ScreenLayout::default(),
        }
    }
}

fn label(side: Side) -> &'static str {
    match side {
        Side::Human => "You",
        Side::Computer => "Computer",
    }
}

const HELP: [&str; 10] = [
    "commands:",
    "  c3-d4 | move c3-d4   play a move (c3xe5 for a capture)",
    "  click X Y            pick a square by screen position",
    "  moves                list your legal moves",
    "  board                show the board",
    "  hint                 suggest a move",
    "  difficulty LEVEL     easy, medium or hard",
    "  new                  start over",
    "  help                 this text",
    "  quit                 leave",
];

pub struct Game {
    board: Board,
    ai: Ai,
    config: GameConfig,
    /// Origin picked by a first click
    selected: Option<Square>,
    running: bool,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let board = Board::new().with_capture_rule(config.capture_rule);
        Self::from_board(config, board)
    }

    /// Resume from an arbitrary position
    pub fn from_board(config: GameConfig, board: Board) -> Self {
        let ai = match config.difficulty {
            Some(level) => {
                let mut ai = Ai::with_params(Side::Computer, config.params.clone());
                ai.set_difficulty(level);
                ai
            }
            None => Ai::with_params(Side::Computer, config.params.clone()),
        };
        Self {
            board,
            ai,
            config,
            selected: None,
            running: true,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn ai(&self) -> &Ai {
        &self.ai
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn handle_command(&mut self, cmd: Command) -> Vec<String> {
        let mut res = Vec::new();
        match cmd {
            Command::Move(mv) => {
                self.selected = None;
                self.play_human(mv, &mut res);
            }
            Command::Click { x, y } => self.click(x, y, &mut res),
            Command::Moves => {
                let moves = self.board.get_all_valid_moves(Side::Human);
                if moves.is_empty() || self.board.side_to_move() != Side::Human {
                    res.push("no moves available".to_string());
                } else {
                    let list: Vec<String> = moves.iter().map(Move::to_string).collect();
                    res.push(list.join(" "));
                }
            }
            Command::Board => res.extend(self.board.to_string().lines().map(str::to_string)),
            Command::Hint => {
                if self.board.side_to_move() != Side::Human || self.board.is_game_over() {
                    res.push("no hint available".to_string());
                } else {
                    let mut helper = Ai::with_params(Side::Human, self.ai.params().clone());
                    match helper.get_best_move(&self.board) {
                        Some(mv) => res.push(format!("hint: {}", mv)),
                        None => res.push("no hint available".to_string()),
                    }
                }
            }
            Command::New => {
                self.board = Board::new().with_capture_rule(self.config.capture_rule);
                self.selected = None;
                // scores from the old game are no use under keep_tt
                self.ai.clear_tt();
                info!("new game");
                res.push("new game, you move first".to_string());
                res.extend(self.board.to_string().lines().map(str::to_string));
            }
            Command::Difficulty(level) => {
                self.ai.set_difficulty(level);
                res.push(format!("difficulty set to {}", level));
            }
            Command::Help => res.extend(HELP.iter().map(|s| s.to_string())),
            Command::Quit => {
                self.running = false;
            }
            Command::Unknown(s) => {
                if !s.is_empty() {
                    res.push(format!("unknown command: {} (try 'help')", s));
                }
            }
        }
        res
    }

    fn click(&mut self, x: i32, y: i32, res: &mut Vec<String>) {
        let sq = self.config.layout.cell_at(x, y);
        if !sq.is_on_board() {
            res.push("click is outside the board".to_string());
            return;
        }
        match self.selected.take() {
            None => match self.board.piece_at(sq) {
                Some(p) if p.owner == Side::Human => {
                    self.selected = Some(sq);
                    res.push(format!("selected {}", sq));
                }
                _ => res.push(format!("no piece of yours on {}", sq)),
            },
            Some(from) if from == sq => res.push(format!("deselected {}", sq)),
            Some(from) => self.play_human(Move::new(from, sq), res),
        }
    }

    fn play_human(&mut self, mv: Move, res: &mut Vec<String>) {
        if self.board.is_game_over() {
            res.push("the game is over, type 'new' to play again".to_string());
            return;
        }
        if self.board.side_to_move() != Side::Human {
            res.push("it is not your turn".to_string());
            return;
        }
        match self.board.apply_move(mv) {
            Ok(undo) => {
                res.push(format!("you play {}", mv));
                self.note_promotion(undo.moved.king, mv.to, res);
            }
            Err(e) => {
                warn!("rejected move {}: {}", mv, e);
                res.push(format!("illegal move: {}", e));
                return;
            }
        }

        if self.board.side_to_move() == Side::Human && !self.board.is_game_over() {
            if let Some(sq) = self.board.pending_jump() {
                res.push(format!("keep jumping with {}", sq));
            }
        } else {
            self.computer_turn(res);
        }
        self.report_status(res);
    }

    /// Let the computer move until the turn returns to the human or the game ends
    fn computer_turn(&mut self, res: &mut Vec<String>) {
        while self.board.side_to_move() == Side::Computer && !self.board.is_game_over() {
            let Some(mv) = self.ai.get_best_move(&self.board) else {
                break;
            };
            match self.board.apply_move(mv) {
                Ok(undo) => {
                    res.push(format!("computer plays {}", mv));
                    self.note_promotion(undo.moved.king, mv.to, res);
                }
                Err(e) => panic!("computer chose {} which does not apply: {}\n{}", mv, e, self.board),
            }
        }
    }

    fn note_promotion(&self, was_king: bool, to: Square, res: &mut Vec<String>) {
        if let Some(p) = self.board.piece_at(to) {
            if p.king && !was_king {
                info!("{:?} crowned on {}", p.owner, to);
                res.push(format!("{} crowned on {}", label(p.owner), to));
            }
        }
    }

    fn report_status(&self, res: &mut Vec<String>) {
        res.extend(self.board.to_string().lines().map(str::to_string));
        if let GameStatus::Won(winner) = self.board.status() {
            info!("game over, {:?} wins", winner);
            match winner {
                Side::Human => res.push("game over: you win".to_string()),
                Side::Computer => res.push("game over: computer wins".to_string()),
            }
        }
    }
}

/// Run the game over arbitrary input/output streams
pub fn run_play_loop_with<R: BufRead, W: Write>(
    config: GameConfig,
    mut reader: R,
    mut writer: W,
) -> io::Result<()> {
    let mut game = Game::new(config);
    writeln!(writer, "damista: you are h, moving up the board. type 'help' for commands")?;
    for line in game.board().to_string().lines() {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;

    let mut buf = String::new();
    while game.is_running() {
        buf.clear();
        let n = reader.read_line(&mut buf)?;
        if n == 0 {
            // EOF
            break;
        }
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }

        let responses = game.handle_command(parse_command(line));
        for r in responses {
            writeln!(writer, "{}", r)?;
        }
        writer.flush()?;
    }

    Ok(())
}

pub fn run_play_loop(config: GameConfig) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_play_loop_with(config, stdin.lock(), stdout.lock())
}

/// Parse and handle one line
pub fn process_line(line: &str, game: &mut Game) -> Vec<String> {
    game.handle_command(parse_command(line))
}
