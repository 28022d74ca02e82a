//! Board representation, move generation and rule enforcement
//!
//! Row 0 is the top of the board. The computer starts on rows 0-2 and moves
//! down the board, the human starts on rows 5-7 and moves up. Only squares
//! with `(row + col) % 2 == 1` are playable. Squares are written in algebraic
//! form: file `a`..`h` is the column, rank `8`..`1` is row 0..7.

use crate::error::{GameError, GameResult};
use crate::zobrist::{self, KEYS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const BOARD_SIZE: i8 = 8;

const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Computer = 0,
    Human = 1,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Computer => Side::Human,
            Side::Human => Side::Computer,
        }
    }

    /// Row delta of a forward step
    pub fn forward(self) -> i8 {
        match self {
            Side::Computer => 1,
            Side::Human => -1,
        }
    }

    pub fn promotion_row(self) -> i8 {
        match self {
            Side::Computer => BOARD_SIZE - 1,
            Side::Human => 0,
        }
    }

    /// Rows holding this side's men in the starting position
    pub fn home_rows(self) -> std::ops::Range<i8> {
        match self {
            Side::Computer => 0..3,
            Side::Human => BOARD_SIZE - 3..BOARD_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    pub fn is_on_board(self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    /// Dark square that pieces may stand on
    pub fn is_playable(self) -> bool {
        self.is_on_board() && (self.row + self.col) % 2 == 1
    }

    /// Index 0..64, only meaningful for on-board squares
    pub fn index(self) -> usize {
        (self.row as usize) * BOARD_SIZE as usize + self.col as usize
    }

    pub fn offset(self, dr: i8, dc: i8) -> Square {
        Square::new(self.row + dr, self.col + dc)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_on_board() {
            let file = (b'a' + self.col as u8) as char;
            let rank = BOARD_SIZE - self.row;
            write!(f, "{}{}", file, rank)
        } else {
            write!(f, "({},{})", self.row, self.col)
        }
    }
}

impl FromStr for Square {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(GameError::Parse(format!("bad square '{}'", s)));
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(GameError::Parse(format!("bad square '{}'", s)));
        }
        let col = (file - b'a') as i8;
        let row = BOARD_SIZE - (rank - b'0') as i8;
        Ok(Square::new(row, col))
    }
}

/// Origin and destination of a single step or single jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    pub fn is_capture(&self) -> bool {
        (self.to.row - self.from.row).abs() == 2
    }

    /// Square jumped over by a capture
    pub fn jumped(&self) -> Option<Square> {
        if self.is_capture() {
            Some(Square::new(
                (self.from.row + self.to.row) / 2,
                (self.from.col + self.to.col) / 2,
            ))
        } else {
            None
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_capture() { 'x' } else { '-' };
        write!(f, "{}{}{}", self.from, sep, self.to)
    }
}

/// Accepts `c3-d4`, `c3xe5`, `c3:e5` and `c3d4`
impl FromStr for Move {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squares: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | 'x' | 'X' | ':' | ' '))
            .collect();
        if squares.len() != 4 || !squares.is_ascii() {
            return Err(GameError::Parse(format!("bad move '{}'", s)));
        }
        let from = squares[0..2].parse()?;
        let to = squares[2..4].parse()?;
        Ok(Move::new(from, to))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub row: i8,
    pub col: i8,
    pub owner: Side,
    pub king: bool,
}

impl Piece {
    pub fn new(row: i8, col: i8, owner: Side) -> Self {
        Self {
            row,
            col,
            owner,
            king: false,
        }
    }

    pub fn crowned(row: i8, col: i8, owner: Side) -> Self {
        Self {
            king: true,
            ..Self::new(row, col, owner)
        }
    }

    pub fn square(&self) -> Square {
        Square::new(self.row, self.col)
    }

    /// Promotion is permanent
    pub fn make_king(&mut self) {
        self.king = true;
    }

    /// Kings go both ways, men only forward
    pub fn can_move_toward(&self, dr: i8) -> bool {
        self.king || dr.signum() == self.owner.forward()
    }
}

/// Whether an available capture must be taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CaptureRule {
    #[default]
    Forced,
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(Side),
}

// Undo entry per rollback
#[derive(Debug, Clone)]
pub struct Undo {
    pub mv: Move,
    /// The moving piece as it was before the move
    pub moved: Piece,
    pub captured: Option<Piece>,
    pub prev_side: Side,
    pub prev_pending: Option<Square>,
    pub prev_zobrist: u64,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
    side: Side,
    /// Piece that captured and must keep capturing
    pending: Option<Square>,
    rule: CaptureRule,
    counts: [u8; 2],
    zobrist: u64,
}

impl Board {
    /// Standard starting position, human to move
    pub fn new() -> Self {
        let mut board = Self::empty(Side::Human);
        board.initialize();
        board
    }

    pub fn empty(side_to_move: Side) -> Self {
        let mut board = Self {
            grid: [[None; 8]; 8],
            side: side_to_move,
            pending: None,
            rule: CaptureRule::default(),
            counts: [0; 2],
            zobrist: 0,
        };
        board.zobrist = board.recalc_zobrist();
        board
    }

    pub fn with_capture_rule(mut self, rule: CaptureRule) -> Self {
        self.rule = rule;
        self
    }

    /// Reset to the starting layout: three rows of men per side on the
    /// playable squares, human to move.
    pub fn initialize(&mut self) {
        self.grid = [[None; 8]; 8];
        self.counts = [0; 2];
        self.side = Side::Human;
        self.pending = None;
        for side in [Side::Computer, Side::Human] {
            for row in side.home_rows() {
                for col in 0..BOARD_SIZE {
                    if Square::new(row, col).is_playable() {
                        self.grid[row as usize][col as usize] = Some(Piece::new(row, col, side));
                        self.counts[side as usize] += 1;
                    }
                }
            }
        }
        self.zobrist = self.recalc_zobrist();
    }

    pub fn capture_rule(&self) -> CaptureRule {
        self.rule
    }

    pub fn side_to_move(&self) -> Side {
        self.side
    }

    /// Hand the turn to `side`, dropping any pending multi-jump
    pub fn set_side_to_move(&mut self, side: Side) {
        if let Some(sq) = self.pending.take() {
            self.zobrist ^= KEYS.pending[sq.index()];
        }
        if self.side != side {
            self.side = side;
            self.zobrist ^= KEYS.side;
        }
    }

    pub fn pending_jump(&self) -> Option<Square> {
        self.pending
    }

    pub fn hash(&self) -> u64 {
        self.zobrist
    }

    pub fn recalc_zobrist(&self) -> u64 {
        zobrist::recalc_zobrist_full(self)
    }

    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        if !sq.is_on_board() {
            return None;
        }
        self.grid[sq.row as usize][sq.col as usize].as_ref()
    }

    /// Put a piece on an empty playable square (setup helper)
    pub fn place(&mut self, piece: Piece) -> GameResult<()> {
        let sq = piece.square();
        if !sq.is_on_board() {
            return Err(GameError::OffBoard(sq));
        }
        if !sq.is_playable() {
            return Err(GameError::Layout(format!("{} is not a playable square", sq)));
        }
        if self.piece_at(sq).is_some() {
            return Err(GameError::Layout(format!("{} is already occupied", sq)));
        }
        self.grid[sq.row as usize][sq.col as usize] = Some(piece);
        self.counts[piece.owner as usize] += 1;
        self.zobrist ^= zobrist::piece_key(&piece);
        Ok(())
    }

    fn take(&mut self, sq: Square) -> Option<Piece> {
        self.grid[sq.row as usize][sq.col as usize].take()
    }

    fn put(&mut self, piece: Piece) {
        self.grid[piece.row as usize][piece.col as usize] = Some(piece);
    }

    pub fn all_pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.grid.iter().flatten().flatten()
    }

    /// Pieces of one side in row-major order
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = &Piece> + '_ {
        self.all_pieces().filter(move |p| p.owner == side)
    }

    pub fn piece_count(&self, side: Side) -> usize {
        self.counts[side as usize] as usize
    }

    pub fn king_count(&self, side: Side) -> usize {
        self.pieces(side).filter(|p| p.king).count()
    }

    // Rules -----------------------------------------------------------

    /// Geometric legality of a single step or jump, ignoring turn order and
    /// the forced-capture rule.
    pub fn is_valid_move(&self, origin: Square, destination: Square) -> bool {
        if !destination.is_on_board() || self.piece_at(destination).is_some() {
            return false;
        }
        let Some(piece) = self.piece_at(origin) else {
            return false;
        };
        let dr = destination.row - origin.row;
        let dc = (destination.col - origin.col).abs();
        match (dr.abs(), dc) {
            (1, 1) => piece.can_move_toward(dr),
            (2, 2) => {
                let mid = Square::new(origin.row + dr / 2, (origin.col + destination.col) / 2);
                let jumps_opponent = matches!(self.piece_at(mid), Some(p) if p.owner != piece.owner);
                jumps_opponent && piece.can_move_toward(dr)
            }
            _ => false,
        }
    }

    fn collect_piece_moves(&self, piece: &Piece, steps: &mut Vec<Move>, captures: &mut Vec<Move>) {
        let from = piece.square();
        for (dr, dc) in DIAGONALS {
            let step = from.offset(dr, dc);
            if self.is_valid_move(from, step) {
                steps.push(Move::new(from, step));
            }
            let jump = from.offset(2 * dr, 2 * dc);
            if self.is_valid_move(from, jump) {
                captures.push(Move::new(from, jump));
            }
        }
    }

    pub fn has_capture_moves(&self, piece: &Piece) -> bool {
        let from = piece.square();
        DIAGONALS
            .iter()
            .any(|&(dr, dc)| self.is_valid_move(from, from.offset(2 * dr, 2 * dc)))
    }

    pub fn has_any_capture(&self, side: Side) -> bool {
        self.pieces(side).any(|p| self.has_capture_moves(p))
    }

    /// Legal destinations of one piece. Under the forced rule a capture
    /// supersedes every simple step of that piece.
    pub fn get_piece_moves(&self, piece: &Piece) -> Vec<Move> {
        let mut steps = Vec::new();
        let mut captures = Vec::new();
        self.collect_piece_moves(piece, &mut steps, &mut captures);
        match self.rule {
            CaptureRule::Forced if !captures.is_empty() => captures,
            CaptureRule::Forced => steps,
            CaptureRule::Free => {
                captures.extend(steps);
                captures
            }
        }
    }

    /// Every legal move for `side`. A pending multi-jump restricts the side to
    /// move to the jumping piece's captures; under the forced rule any capture
    /// on the board excludes all simple steps.
    pub fn get_all_valid_moves(&self, side: Side) -> Vec<Move> {
        if side == self.side {
            if let Some(sq) = self.pending {
                let mut steps = Vec::new();
                let mut captures = Vec::new();
                if let Some(piece) = self.piece_at(sq) {
                    self.collect_piece_moves(piece, &mut steps, &mut captures);
                }
                return captures;
            }
        }

        let mut moves = Vec::with_capacity(16);
        let mut captures = Vec::new();
        for piece in self.pieces(side) {
            match self.rule {
                CaptureRule::Forced => self.collect_piece_moves(piece, &mut moves, &mut captures),
                CaptureRule::Free => moves.extend(self.get_piece_moves(piece)),
            }
        }
        if self.rule == CaptureRule::Forced && !captures.is_empty() {
            captures
        } else {
            moves
        }
    }

    /// Whether `side` has at least one legal move, without allocating
    pub fn has_moves(&self, side: Side) -> bool {
        if side == self.side && self.pending.is_some() {
            return true;
        }
        self.pieces(side).any(|p| {
            let from = p.square();
            DIAGONALS.iter().any(|&(dr, dc)| {
                self.is_valid_move(from, from.offset(dr, dc))
                    || self.is_valid_move(from, from.offset(2 * dr, 2 * dc))
            })
        })
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.get_all_valid_moves(self.side).contains(&mv)
    }

    /// Validate and play a move for the side to move. Rejected moves leave
    /// the board untouched.
    pub fn apply_move(&mut self, mv: Move) -> GameResult<Undo> {
        for sq in [mv.from, mv.to] {
            if !sq.is_on_board() {
                return Err(GameError::OffBoard(sq));
            }
        }
        let piece = *self.piece_at(mv.from).ok_or(GameError::EmptyOrigin(mv.from))?;
        if piece.owner != self.side {
            return Err(GameError::NotYourPiece {
                square: mv.from,
                side: self.side,
            });
        }
        if !self.is_legal(mv) {
            let reason = if !self.is_valid_move(mv.from, mv.to) {
                "not a legal step or jump for this piece"
            } else if self.pending.is_some() {
                "the jumping piece must continue capturing"
            } else {
                "a capture is available and must be taken"
            };
            return Err(GameError::InvalidMove { mv, reason });
        }
        Ok(self.make_move(mv))
    }

    /// Driver convenience wrapper around [`Board::apply_move`]
    pub fn move_piece(&mut self, origin: Square, destination: Square) -> GameResult<Undo> {
        self.apply_move(Move::new(origin, destination))
    }

    /// Play a move generated from this very position.
    ///
    /// # Panics
    /// If the origin is empty: the move list and the board are out of sync.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let Some(mut piece) = self.take(mv.from) else {
            panic!("make_move: no piece on {} for move {}\n{}", mv.from, mv, self);
        };
        let moved = piece;
        let prev_zobrist = self.zobrist;
        self.zobrist ^= zobrist::piece_key(&piece);

        let captured = mv.jumped().and_then(|mid| self.take(mid));
        if let Some(victim) = &captured {
            self.zobrist ^= zobrist::piece_key(victim);
            self.counts[victim.owner as usize] -= 1;
        }

        piece.row = mv.to.row;
        piece.col = mv.to.col;
        if !piece.king && piece.row == piece.owner.promotion_row() {
            piece.make_king();
        }
        self.zobrist ^= zobrist::piece_key(&piece);
        self.put(piece);

        let prev_side = self.side;
        let prev_pending = self.pending.take();
        if let Some(sq) = prev_pending {
            self.zobrist ^= KEYS.pending[sq.index()];
        }
        if captured.is_some() && self.has_capture_moves(&piece) {
            self.pending = Some(mv.to);
            self.zobrist ^= KEYS.pending[mv.to.index()];
        } else {
            self.side = self.side.opponent();
            self.zobrist ^= KEYS.side;
        }

        Undo {
            mv,
            moved,
            captured,
            prev_side,
            prev_pending,
            prev_zobrist,
        }
    }

    /// Reverse a move made by [`Board::make_move`] or [`Board::apply_move`].
    /// Undos must be applied in LIFO order.
    pub fn undo_move(&mut self, undo: Undo) {
        self.take(undo.mv.to);
        self.put(undo.moved);
        if let Some(victim) = undo.captured {
            self.put(victim);
            self.counts[victim.owner as usize] += 1;
        }
        self.side = undo.prev_side;
        self.pending = undo.prev_pending;
        self.zobrist = undo.prev_zobrist;
    }

    /// The winner, if the side to move (checked first) or its opponent has
    /// no legal move left.
    pub fn check_winner(&self) -> Option<Side> {
        [self.side, self.side.opponent()]
            .into_iter()
            .find(|&side| !self.has_moves(side))
            .map(Side::opponent)
    }

    pub fn is_game_over(&self) -> bool {
        self.check_winner().is_some()
    }

    pub fn status(&self) -> GameStatus {
        match self.check_winner() {
            Some(side) => GameStatus::Won(side),
            None => GameStatus::InProgress,
        }
    }

    /// Count leaf nodes of the move tree, one ply per single step or jump
    pub fn perft(&mut self, depth: u8) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.get_all_valid_moves(self.side);
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0u64;
        for mv in moves {
            let undo = self.make_move(mv);
            nodes += self.perft(depth - 1);
            self.undo_move(undo);
        }
        nodes
    }

    /// Perft split by root move
    pub fn perft_divide(&mut self, depth: u8) -> Vec<(Move, u64)> {
        let moves = self.get_all_valid_moves(self.side);
        let mut out = Vec::with_capacity(moves.len());
        for mv in moves {
            let undo = self.make_move(mv);
            let nodes = self.perft(depth.saturating_sub(1));
            self.undo_move(undo);
            out.push((mv, nodes));
        }
        out
    }

    // Layout text -----------------------------------------------------

    /// Parse eight rows of eight cells: `.` empty, `c`/`C` computer man/king,
    /// `h`/`H` human man/king. Whitespace, rank labels and the file label
    /// line printed by `Display` are ignored.
    pub fn from_layout(text: &str, side_to_move: Side) -> GameResult<Board> {
        let rows: Vec<String> = text
            .lines()
            // file label line
            .filter(|l| {
                !l.chars()
                    .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'c' | 'C' | 'h' | 'H'))
            })
            .map(|l| {
                l.chars()
                    .filter(|c| matches!(c, '.' | 'c' | 'C' | 'h' | 'H'))
                    .collect::<String>()
            })
            .filter(|l| !l.is_empty())
            .collect();
        if rows.len() != BOARD_SIZE as usize {
            return Err(GameError::Layout(format!(
                "expected 8 rows, found {}",
                rows.len()
            )));
        }

        let mut board = Board::empty(side_to_move);
        for (r, line) in rows.iter().enumerate() {
            if line.len() != BOARD_SIZE as usize {
                return Err(GameError::Layout(format!(
                    "row {} has {} cells",
                    r,
                    line.len()
                )));
            }
            for (c, ch) in line.chars().enumerate() {
                let (row, col) = (r as i8, c as i8);
                let piece = match ch {
                    'c' => Piece::new(row, col, Side::Computer),
                    'C' => Piece::crowned(row, col, Side::Computer),
                    'h' => Piece::new(row, col, Side::Human),
                    'H' => Piece::crowned(row, col, Side::Human),
                    _ => continue,
                };
                board.place(piece)?;
            }
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "side={:?} pending={:?} rule={:?}", self.side, self.pending, self.rule)?;
        write!(f, "{}", self)
    }
}

// Simple display, same alphabet as `from_layout`
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            write!(f, "{} ", BOARD_SIZE - row)?;
            for col in 0..BOARD_SIZE {
                let ch = match self.piece_at(Square::new(row, col)) {
                    Some(p) => match (p.owner, p.king) {
                        (Side::Computer, false) => 'c',
                        (Side::Computer, true) => 'C',
                        (Side::Human, false) => 'h',
                        (Side::Human, true) => 'H',
                    },
                    None => '.',
                };
                write!(f, " {}", ch)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_make_unmake_zobrist_invariant() {
        let mut board = Board::new();
        let start = board.clone();
        let moves = board.get_all_valid_moves(Side::Human);
        for mv in moves {
            let undo = board.make_move(mv);
            assert_eq!(board.hash(), board.recalc_zobrist());
            board.undo_move(undo);
            assert_eq!(board, start);
        }
    }

    #[test]
    fn square_notation() {
        assert_eq!(sq("a8"), Square::new(0, 0));
        assert_eq!(sq("h1"), Square::new(7, 7));
        assert_eq!(Square::new(5, 2).to_string(), "c3");
        assert!("i9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
    }

    #[test]
    fn move_notation() {
        let mv: Move = "c3-d4".parse().unwrap();
        assert_eq!(mv, Move::new(sq("c3"), sq("d4")));
        assert_eq!("c3d4".parse::<Move>().unwrap(), mv);
        let jump: Move = "c3xe5".parse().unwrap();
        assert!(jump.is_capture());
        assert_eq!(jump.jumped(), Some(sq("d4")));
        assert_eq!(jump.to_string(), "c3xe5");
        assert!("c3-".parse::<Move>().is_err());
    }

    #[test]
    fn layout_rejects_light_squares() {
        let text = "c.......\n........\n........\n........\n........\n........\n........\n........";
        assert!(matches!(
            Board::from_layout(text, Side::Human),
            Err(GameError::Layout(_))
        ));
    }

    #[test]
    fn display_round_trips_through_layout() {
        let board = Board::new();
        let parsed = Board::from_layout(&board.to_string(), Side::Human).unwrap();
        assert_eq!(parsed, board);
    }
}
