//! Game-state payloads for the eight supported games.
//!
//! The room layer treats [`GameState`] as opaque: it is produced by a rule
//! module's `init`, mutated in place by `process_action`, and broadcast
//! verbatim inside `Packet::GameUpdate`. Each variant carries everything its
//! game needs, including whose turn it is.

use serde::{Deserialize, Serialize};

use crate::Seat;

/// Closed set of game types the server knows how to referee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    TicTacToe,
    Connect4,
    Gomoku,
    Reversi,
    Checkers,
    Chess,
    Password,
    WheelOfFortune,
}

impl GameKind {
    /// Registry order; also the order games are listed to clients.
    pub const ALL: [GameKind; 8] = [
        GameKind::Checkers,
        GameKind::Chess,
        GameKind::Connect4,
        GameKind::Gomoku,
        GameKind::Password,
        GameKind::Reversi,
        GameKind::TicTacToe,
        GameKind::WheelOfFortune,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            GameKind::TicTacToe => "tictactoe",
            GameKind::Connect4 => "connect4",
            GameKind::Gomoku => "gomoku",
            GameKind::Reversi => "reversi",
            GameKind::Checkers => "checkers",
            GameKind::Chess => "chess",
            GameKind::Password => "password",
            GameKind::WheelOfFortune => "wheeloffortune",
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Board coordinate, row-major from the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Every action any game understands. A rule module silently rejects
/// variants that do not belong to its game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameAction {
    /// Tic-tac-toe: claim a cell by linear index 0..9.
    Place { index: usize },
    /// Connect-4: drop a disc into a column.
    Drop { col: usize },
    /// Gomoku / reversi: place at a coordinate.
    PlaceAt { row: usize, col: usize },
    /// Chess / checkers: move a piece. `promotion` is chess-only.
    Move {
        from: Coord,
        to: Coord,
        promotion: Option<PieceKind>,
    },
    /// Password: the clue giver submits a one-word clue.
    GiveClue { clue: String },
    /// Password: the guesser attempts the secret word.
    WordGuess { guess: String },
    /// Wheel of fortune: spin the wheel.
    Spin,
    /// Wheel of fortune: guess a consonant.
    GuessLetter { letter: char },
    /// Wheel of fortune: buy a vowel.
    BuyVowel { letter: char },
    /// Wheel of fortune: attempt the full phrase.
    Solve { answer: String },
}

/// Result envelope returned by a rule module for an accepted action.
/// `winner == None` with `game_over` set denotes a draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub game_over: bool,
    pub winner: Option<Seat>,
    pub winner_name: Option<String>,
    pub reason: Option<String>,
    /// Winning line as linear cell indices (tic-tac-toe).
    pub win_pattern: Option<Vec<usize>>,
    /// Winning run as coordinates (connect-4, gomoku).
    pub win_cells: Option<Vec<Coord>>,
    /// Set when a wheel-of-fortune solve attempt missed.
    pub solve_failed: bool,
}

impl Outcome {
    /// Accepted move, game continues.
    pub fn ongoing() -> Self {
        Self {
            game_over: false,
            winner: None,
            winner_name: None,
            reason: None,
            win_pattern: None,
            win_cells: None,
            solve_failed: false,
        }
    }

    pub fn win(seat: Seat, name: &str) -> Self {
        Self {
            game_over: true,
            winner: Some(seat),
            winner_name: Some(name.to_string()),
            ..Self::ongoing()
        }
    }

    pub fn draw() -> Self {
        Self {
            game_over: true,
            ..Self::ongoing()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameState {
    TicTacToe(TicTacToeState),
    Connect4(Connect4State),
    Gomoku(GomokuState),
    Reversi(ReversiState),
    Checkers(CheckersState),
    Chess(ChessState),
    Password(PasswordState),
    Wheel(WheelState),
}

// ── Tic-tac-toe ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicTacToeState {
    pub board: [Option<Mark>; 9],
    pub current_turn: Seat,
    pub moves: Vec<(Seat, usize)>,
}

// ── Connect-4 ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disc {
    Red,
    Yellow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connect4State {
    /// 6 rows × 7 columns, row 0 at the top.
    pub board: [[Option<Disc>; 7]; 6],
    pub current_turn: Seat,
    pub last_move: Option<Coord>,
}

// ── Gomoku / reversi ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    pub fn opponent(&self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GomokuState {
    /// 15 × 15 Go-style board.
    pub board: [[Option<Stone>; 15]; 15],
    pub current_turn: Seat,
    pub last_move: Option<Coord>,
    pub move_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReversiState {
    pub board: [[Option<Stone>; 8]; 8],
    pub current_turn: Seat,
    /// (black, white) disc counts, recomputed after every move.
    pub scores: (u32, u32),
    /// Legal placements for the seat on turn; recomputed after every move.
    pub valid_moves: Vec<Coord>,
}

// ── Checkers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckersColor {
    Black,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckersPiece {
    pub color: CheckersColor,
    pub is_king: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckersState {
    pub board: [[Option<CheckersPiece>; 8]; 8],
    pub current_turn: Seat,
}

// ── Chess ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChessColor {
    White,
    Black,
}

impl ChessColor {
    pub fn opponent(&self) -> ChessColor {
        match self {
            ChessColor::White => ChessColor::Black,
            ChessColor::Black => ChessColor::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessPiece {
    pub kind: PieceKind,
    pub color: ChessColor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChessMove {
    pub from: Coord,
    pub to: Coord,
    pub piece: PieceKind,
    pub color: ChessColor,
    pub captured: Option<PieceKind>,
}

/// "Has moved" flags that permanently foreclose castling options.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CastlingFlags {
    pub w_king: bool,
    pub b_king: bool,
    pub w_rook_a: bool,
    pub w_rook_h: bool,
    pub b_rook_a: bool,
    pub b_rook_h: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChessState {
    /// Row 0 is black's back rank, row 7 white's.
    pub board: [[Option<ChessPiece>; 8]; 8],
    pub current_turn: Seat,
    pub moves: Vec<ChessMove>,
    /// Pieces lost by white / by black.
    pub captured_white: Vec<PieceKind>,
    pub captured_black: Vec<PieceKind>,
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    /// Square a pawn skipped over last move; capturable for one move only.
    pub en_passant: Option<Coord>,
    pub castling: CastlingFlags,
}

// ── Password ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordPhase {
    GiveClue,
    Guess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuessResult {
    Correct,
    Wrong,
    Pass,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClueEntry {
    pub giver: Seat,
    pub clue: String,
    pub guess: Option<String>,
    pub correct: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordState {
    pub secret_word: String,
    pub used_words: Vec<String>,
    pub clues: Vec<ClueEntry>,
    pub scores: [u32; 2],
    pub clue_giver: Seat,
    pub guesser: Seat,
    pub phase: PasswordPhase,
    pub clue_count: u32,
    pub last_result: Option<GuessResult>,
}

// ── Wheel of fortune ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WheelPhase {
    Spin,
    Act,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinResult {
    Cash(u32),
    Bankrupt,
    LoseATurn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelState {
    pub phrase: String,
    pub category: String,
    /// One slot per phrase character; spaces are pre-revealed.
    pub revealed: Vec<Option<char>>,
    pub guessed: Vec<char>,
    /// Banked totals, kept across bankrupts.
    pub scores: [u32; 2],
    /// Earnings this round, wiped by a bankrupt spin.
    pub round_scores: [u32; 2],
    pub current_turn: Seat,
    pub phase: WheelPhase,
    pub last_spin: Option<SpinResult>,
    pub total_letters: usize,
    pub revealed_count: usize,
}
