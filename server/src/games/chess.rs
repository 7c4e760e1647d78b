//! Chess with full legality: per-piece move generation, simulate-and-check
//! filtering, castling, en passant, promotion, and checkmate/stalemate
//! detection. Seat 0 plays white (rows 6–7) and moves first; row 0 is
//! black's back rank.

use rand::RngCore;
use shared::{
    ChessColor, ChessMove, ChessPiece, ChessState, Coord, GameAction, GameKind, GameState, Outcome,
    PieceKind,
};

use crate::registry::{GameMeta, GameModule, TurnCtx};

const META: GameMeta = GameMeta {
    kind: GameKind::Chess,
    label: "Chess",
    icon: "♟️",
    min_players: 2,
    max_players: 2,
};

const ROOK_DIRS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

type Board = [[Option<ChessPiece>; 8]; 8];

pub struct Chess;

impl GameModule for Chess {
    fn meta(&self) -> &GameMeta {
        &META
    }

    fn init(&self, _rng: &mut dyn RngCore) -> GameState {
        GameState::Chess(ChessState {
            board: starting_board(),
            current_turn: 0,
            moves: Vec::new(),
            captured_white: Vec::new(),
            captured_black: Vec::new(),
            check: false,
            checkmate: false,
            stalemate: false,
            en_passant: None,
            castling: Default::default(),
        })
    }

    fn process_action(
        &self,
        ctx: &TurnCtx<'_>,
        state: &mut GameState,
        action: &GameAction,
        _rng: &mut dyn RngCore,
    ) -> Option<Outcome> {
        let GameState::Chess(s) = state else {
            return None;
        };
        let GameAction::Move {
            from,
            to,
            promotion,
        } = *action
        else {
            return None;
        };
        if from.row >= 8 || from.col >= 8 || to.row >= 8 || to.col >= 8 {
            return None;
        }

        let color = seat_color(ctx.seat);
        if seat_color(s.current_turn) != color {
            return None;
        }
        let mut piece = match s.board[from.row][from.col] {
            Some(p) if p.color == color => p,
            _ => return None,
        };
        if !legal_moves(s, from.row, from.col)
            .iter()
            .any(|m| m.row == to.row && m.col == to.col)
        {
            return None;
        }

        let captured = s.board[to.row][to.col];
        if let Some(victim) = captured {
            push_captured(s, victim);
        }

        // En passant removes a pawn that is not on the destination square.
        if piece.kind == PieceKind::Pawn && s.en_passant == Some(to) {
            let victim_row = match color {
                ChessColor::White => to.row + 1,
                ChessColor::Black => to.row - 1,
            };
            if let Some(victim) = s.board[victim_row][to.col] {
                push_captured(s, victim);
                s.board[victim_row][to.col] = None;
            }
        }

        // The skipped square is capturable for exactly one reply.
        s.en_passant = if piece.kind == PieceKind::Pawn && from.row.abs_diff(to.row) == 2 {
            Some(Coord::new((from.row + to.row) / 2, from.col))
        } else {
            None
        };

        if piece.kind == PieceKind::Pawn && (to.row == 0 || to.row == 7) {
            piece.kind = match promotion {
                Some(kind @ (PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight)) => kind,
                _ => PieceKind::Queen,
            };
        }

        // Castling relocates the rook alongside the two-file king move.
        if piece.kind == PieceKind::King && from.col.abs_diff(to.col) == 2 {
            if to.col > from.col {
                s.board[from.row][5] = s.board[from.row][7].take();
            } else {
                s.board[from.row][3] = s.board[from.row][0].take();
            }
        }

        s.board[to.row][to.col] = Some(piece);
        s.board[from.row][from.col] = None;

        if piece.kind == PieceKind::King {
            match color {
                ChessColor::White => s.castling.w_king = true,
                ChessColor::Black => s.castling.b_king = true,
            }
        }
        if piece.kind == PieceKind::Rook {
            match (color, from.col) {
                (ChessColor::White, 0) => s.castling.w_rook_a = true,
                (ChessColor::White, 7) => s.castling.w_rook_h = true,
                (ChessColor::Black, 0) => s.castling.b_rook_a = true,
                (ChessColor::Black, 7) => s.castling.b_rook_h = true,
                _ => {}
            }
        }

        s.moves.push(ChessMove {
            from,
            to,
            piece: piece.kind,
            color,
            captured: captured.map(|p| p.kind),
        });
        s.current_turn = 1 - s.current_turn;

        let next = seat_color(s.current_turn);
        s.check = in_check(&s.board, next);
        let any_reply = has_legal_move(s, next);
        s.checkmate = s.check && !any_reply;
        s.stalemate = !s.check && !any_reply;

        if s.checkmate {
            let mut outcome = Outcome::win(ctx.seat, ctx.username);
            outcome.reason = Some("checkmate".to_string());
            return Some(outcome);
        }
        if s.stalemate {
            let mut outcome = Outcome::draw();
            outcome.reason = Some("stalemate".to_string());
            return Some(outcome);
        }
        Some(Outcome::ongoing())
    }
}

fn seat_color(seat: usize) -> ChessColor {
    if seat == 0 {
        ChessColor::White
    } else {
        ChessColor::Black
    }
}

fn push_captured(s: &mut ChessState, victim: ChessPiece) {
    match victim.color {
        ChessColor::White => s.captured_white.push(victim.kind),
        ChessColor::Black => s.captured_black.push(victim.kind),
    }
}

fn starting_board() -> Board {
    let back = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];
    let mut board: Board = [[None; 8]; 8];
    for (col, &kind) in back.iter().enumerate() {
        board[0][col] = Some(ChessPiece {
            kind,
            color: ChessColor::Black,
        });
        board[1][col] = Some(ChessPiece {
            kind: PieceKind::Pawn,
            color: ChessColor::Black,
        });
        board[6][col] = Some(ChessPiece {
            kind: PieceKind::Pawn,
            color: ChessColor::White,
        });
        board[7][col] = Some(ChessPiece {
            kind,
            color: ChessColor::White,
        });
    }
    board
}

fn on_board(row: i32, col: i32) -> bool {
    (0..8).contains(&row) && (0..8).contains(&col)
}

/// Legal destinations for the piece at (row, col): pseudo-legal generation
/// filtered by simulating each move and rejecting any that leaves the
/// mover's own king attacked.
fn legal_moves(s: &ChessState, row: usize, col: usize) -> Vec<Coord> {
    let piece = match s.board[row][col] {
        Some(p) => p,
        None => return Vec::new(),
    };
    let candidates = match piece.kind {
        PieceKind::Pawn => pawn_moves(s, row, col, piece.color),
        PieceKind::Rook => slide(&s.board, row, col, piece.color, &ROOK_DIRS),
        PieceKind::Knight => knight_moves(&s.board, row, col, piece.color),
        PieceKind::Bishop => slide(&s.board, row, col, piece.color, &BISHOP_DIRS),
        PieceKind::Queen => {
            let mut moves = slide(&s.board, row, col, piece.color, &ROOK_DIRS);
            moves.extend(slide(&s.board, row, col, piece.color, &BISHOP_DIRS));
            moves
        }
        PieceKind::King => king_moves(s, row, col, piece.color),
    };

    candidates
        .into_iter()
        .filter(|m| {
            let mut board = s.board;
            board[m.row][m.col] = board[row][col];
            board[row][col] = None;
            if piece.kind == PieceKind::Pawn && s.en_passant == Some(*m) {
                let victim_row = match piece.color {
                    ChessColor::White => m.row + 1,
                    ChessColor::Black => m.row - 1,
                };
                board[victim_row][m.col] = None;
            }
            !in_check(&board, piece.color)
        })
        .collect()
}

fn pawn_moves(s: &ChessState, row: usize, col: usize, color: ChessColor) -> Vec<Coord> {
    let dir: i32 = match color {
        ChessColor::White => -1,
        ChessColor::Black => 1,
    };
    let start_row = match color {
        ChessColor::White => 6,
        ChessColor::Black => 1,
    };
    let mut moves = Vec::new();

    let one = row as i32 + dir;
    if on_board(one, col as i32) && s.board[one as usize][col].is_none() {
        moves.push(Coord::new(one as usize, col));
        let two = row as i32 + 2 * dir;
        if row == start_row && s.board[two as usize][col].is_none() {
            moves.push(Coord::new(two as usize, col));
        }
    }

    for dc in [-1i32, 1] {
        let (nr, nc) = (row as i32 + dir, col as i32 + dc);
        if !on_board(nr, nc) {
            continue;
        }
        let target = Coord::new(nr as usize, nc as usize);
        match s.board[target.row][target.col] {
            Some(p) if p.color != color => moves.push(target),
            None if s.en_passant == Some(target) => moves.push(target),
            _ => {}
        }
    }
    moves
}

fn slide(
    board: &Board,
    row: usize,
    col: usize,
    color: ChessColor,
    dirs: &[(i32, i32)],
) -> Vec<Coord> {
    let mut moves = Vec::new();
    for &(dr, dc) in dirs {
        for i in 1..8 {
            let (r, c) = (row as i32 + dr * i, col as i32 + dc * i);
            if !on_board(r, c) {
                break;
            }
            match board[r as usize][c as usize] {
                Some(p) => {
                    if p.color != color {
                        moves.push(Coord::new(r as usize, c as usize));
                    }
                    break;
                }
                None => moves.push(Coord::new(r as usize, c as usize)),
            }
        }
    }
    moves
}

fn knight_moves(board: &Board, row: usize, col: usize, color: ChessColor) -> Vec<Coord> {
    KNIGHT_OFFSETS
        .iter()
        .map(|&(dr, dc)| (row as i32 + dr, col as i32 + dc))
        .filter(|&(r, c)| on_board(r, c))
        .filter(|&(r, c)| {
            board[r as usize][c as usize].map_or(true, |p| p.color != color)
        })
        .map(|(r, c)| Coord::new(r as usize, c as usize))
        .collect()
}

fn king_moves(s: &ChessState, row: usize, col: usize, color: ChessColor) -> Vec<Coord> {
    let mut moves = Vec::new();
    for dr in -1i32..=1 {
        for dc in -1i32..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            let (r, c) = (row as i32 + dr, col as i32 + dc);
            if on_board(r, c)
                && s.board[r as usize][c as usize].map_or(true, |p| p.color != color)
            {
                moves.push(Coord::new(r as usize, c as usize));
            }
        }
    }

    let king_moved = match color {
        ChessColor::White => s.castling.w_king,
        ChessColor::Black => s.castling.b_king,
    };
    if king_moved || in_check(&s.board, color) {
        return moves;
    }

    // Kingside: rook on file h unmoved and present, path clear, and neither
    // square the king crosses may be attacked.
    let h_rook_moved = match color {
        ChessColor::White => s.castling.w_rook_h,
        ChessColor::Black => s.castling.b_rook_h,
    };
    if !h_rook_moved
        && col + 2 < 8
        && own_rook_at(&s.board, row, 7, color)
        && s.board[row][col + 1].is_none()
        && s.board[row][col + 2].is_none()
        && castling_path_safe(&s.board, row, col, &[col + 1, col + 2], color)
    {
        moves.push(Coord::new(row, col + 2));
    }

    let a_rook_moved = match color {
        ChessColor::White => s.castling.w_rook_a,
        ChessColor::Black => s.castling.b_rook_a,
    };
    if !a_rook_moved
        && col >= 3
        && own_rook_at(&s.board, row, 0, color)
        && s.board[row][col - 1].is_none()
        && s.board[row][col - 2].is_none()
        && s.board[row][col - 3].is_none()
        && castling_path_safe(&s.board, row, col, &[col - 1, col - 2], color)
    {
        moves.push(Coord::new(row, col - 2));
    }
    moves
}

fn own_rook_at(board: &Board, row: usize, col: usize, color: ChessColor) -> bool {
    matches!(board[row][col], Some(p) if p.kind == PieceKind::Rook && p.color == color)
}

fn castling_path_safe(board: &Board, row: usize, col: usize, cols: &[usize], color: ChessColor) -> bool {
    cols.iter().all(|&c| {
        let mut sim = *board;
        sim[row][c] = sim[row][col];
        sim[row][col] = None;
        !in_check(&sim, color)
    })
}

/// Squares a pawn attacks (diagonal-forward only; not its move pattern).
fn pawn_attacks(row: usize, col: usize, color: ChessColor) -> Vec<Coord> {
    let dir: i32 = match color {
        ChessColor::White => -1,
        ChessColor::Black => 1,
    };
    [-1i32, 1]
        .iter()
        .map(|&dc| (row as i32 + dir, col as i32 + dc))
        .filter(|&(r, c)| on_board(r, c))
        .map(|(r, c)| Coord::new(r as usize, c as usize))
        .collect()
}

fn in_check(board: &Board, color: ChessColor) -> bool {
    let mut king = None;
    for (r, row) in board.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if matches!(cell, Some(p) if p.kind == PieceKind::King && p.color == color) {
                king = Some(Coord::new(r, c));
            }
        }
    }
    let Some(king) = king else {
        return false;
    };

    let enemy = color.opponent();
    for r in 0..8usize {
        for c in 0..8usize {
            let piece = match board[r][c] {
                Some(p) if p.color == enemy => p,
                _ => continue,
            };
            let attacks = match piece.kind {
                PieceKind::Pawn => pawn_attacks(r, c, enemy),
                PieceKind::Rook => slide(board, r, c, enemy, &ROOK_DIRS),
                PieceKind::Knight => knight_moves(board, r, c, enemy),
                PieceKind::Bishop => slide(board, r, c, enemy, &BISHOP_DIRS),
                PieceKind::Queen => {
                    let mut a = slide(board, r, c, enemy, &ROOK_DIRS);
                    a.extend(slide(board, r, c, enemy, &BISHOP_DIRS));
                    a
                }
                PieceKind::King => {
                    let mut a = Vec::new();
                    for dr in -1i32..=1 {
                        for dc in -1i32..=1 {
                            if dr == 0 && dc == 0 {
                                continue;
                            }
                            let (ar, ac) = (r as i32 + dr, c as i32 + dc);
                            if on_board(ar, ac) {
                                a.push(Coord::new(ar as usize, ac as usize));
                            }
                        }
                    }
                    a
                }
            };
            if attacks.iter().any(|m| *m == king) {
                return true;
            }
        }
    }
    false
}

fn has_legal_move(s: &ChessState, color: ChessColor) -> bool {
    for r in 0..8usize {
        for c in 0..8usize {
            if matches!(s.board[r][c], Some(p) if p.color == color)
                && !legal_moves(s, r, c).is_empty()
            {
                return true;
            }
        }
    }
    false
}
