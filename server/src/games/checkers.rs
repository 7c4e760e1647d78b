//! Checkers on an 8×8 board, dark squares only. Seat 0 plays black from rows
//! 5–7 advancing toward row 0; seat 1 plays red from rows 0–2 advancing
//! toward row 7. Captures are mandatory board-wide: while any capture exists
//! for the mover's color, simple moves are rejected. A single jump per turn;
//! reaching the far row promotes to king.

use rand::RngCore;
use shared::{
    CheckersColor, CheckersPiece, CheckersState, Coord, GameAction, GameKind, GameState, Outcome,
};

use crate::registry::{GameMeta, GameModule, TurnCtx};

const META: GameMeta = GameMeta {
    kind: GameKind::Checkers,
    label: "Checkers",
    icon: "⛀",
    min_players: 2,
    max_players: 2,
};

type Board = [[Option<CheckersPiece>; 8]; 8];

pub struct Checkers;

impl GameModule for Checkers {
    fn meta(&self) -> &GameMeta {
        &META
    }

    fn init(&self, _rng: &mut dyn RngCore) -> GameState {
        let mut board: Board = [[None; 8]; 8];
        for row in 0..3 {
            for col in 0..8 {
                if (row + col) % 2 == 1 {
                    board[row][col] = Some(CheckersPiece {
                        color: CheckersColor::Red,
                        is_king: false,
                    });
                }
            }
        }
        for row in 5..8 {
            for col in 0..8 {
                if (row + col) % 2 == 1 {
                    board[row][col] = Some(CheckersPiece {
                        color: CheckersColor::Black,
                        is_king: false,
                    });
                }
            }
        }
        GameState::Checkers(CheckersState {
            board,
            current_turn: 0,
        })
    }

    fn process_action(
        &self,
        ctx: &TurnCtx<'_>,
        state: &mut GameState,
        action: &GameAction,
        _rng: &mut dyn RngCore,
    ) -> Option<Outcome> {
        let GameState::Checkers(s) = state else {
            return None;
        };
        let GameAction::Move { from, to, .. } = *action else {
            return None;
        };
        if s.current_turn != ctx.seat {
            return None;
        }
        if from.row >= 8 || from.col >= 8 || to.row >= 8 || to.col >= 8 {
            return None;
        }

        let color = seat_color(ctx.seat);
        match s.board[from.row][from.col] {
            Some(piece) if piece.color == color => {}
            _ => return None,
        }
        if !apply_move(s, from, to, color) {
            return None;
        }

        if let Some(winner) = winner_by_elimination(&s.board) {
            return Some(Outcome::win(winner, ctx.name_of(winner)));
        }
        Some(Outcome::ongoing())
    }
}

fn seat_color(seat: usize) -> CheckersColor {
    if seat == 0 {
        CheckersColor::Black
    } else {
        CheckersColor::Red
    }
}

/// Row delta a non-king piece must advance along: black climbs toward row 0,
/// red descends toward row 7.
fn forward_dir(color: CheckersColor) -> i32 {
    match color {
        CheckersColor::Black => -1,
        CheckersColor::Red => 1,
    }
}

fn diagonals(piece: &CheckersPiece) -> Vec<(i32, i32)> {
    if piece.is_king {
        vec![(-1, -1), (-1, 1), (1, -1), (1, 1)]
    } else {
        let dir = forward_dir(piece.color);
        vec![(dir, -1), (dir, 1)]
    }
}

fn king_row(color: CheckersColor) -> usize {
    match color {
        CheckersColor::Black => 0,
        CheckersColor::Red => 7,
    }
}

/// Validates and applies one move; returns false (untouched board) for
/// anything illegal.
fn apply_move(s: &mut CheckersState, from: Coord, to: Coord, color: CheckersColor) -> bool {
    let piece = match s.board[from.row][from.col] {
        Some(p) => p,
        None => return false,
    };
    let dr = to.row as i32 - from.row as i32;
    let dc = to.col as i32 - from.col as i32;
    if !piece.is_king && dr.signum() != forward_dir(color) {
        return false;
    }
    if s.board[to.row][to.col].is_some() {
        return false;
    }

    if dr.abs() == 1 && dc.abs() == 1 {
        if !mandatory_captures(&s.board, color).is_empty() {
            return false;
        }
        s.board[to.row][to.col] = Some(piece);
        s.board[from.row][from.col] = None;
    } else if dr.abs() == 2 && dc.abs() == 2 {
        let mid_row = ((from.row as i32 + to.row as i32) / 2) as usize;
        let mid_col = ((from.col as i32 + to.col as i32) / 2) as usize;
        match s.board[mid_row][mid_col] {
            Some(mid) if mid.color != color => {}
            _ => return false,
        }
        s.board[to.row][to.col] = Some(piece);
        s.board[from.row][from.col] = None;
        s.board[mid_row][mid_col] = None;
    } else {
        return false;
    }

    if to.row == king_row(color) {
        if let Some(p) = s.board[to.row][to.col].as_mut() {
            p.is_king = true;
        }
    }
    s.current_turn = 1 - s.current_turn;
    true
}

/// Every capture jump available to `color` anywhere on the board.
fn mandatory_captures(board: &Board, color: CheckersColor) -> Vec<(Coord, Coord)> {
    let mut captures = Vec::new();
    for row in 0..8usize {
        for col in 0..8usize {
            let piece = match board[row][col] {
                Some(p) if p.color == color => p,
                _ => continue,
            };
            for (dr, dc) in diagonals(&piece) {
                let mid_row = row as i32 + dr;
                let mid_col = col as i32 + dc;
                let to_row = row as i32 + dr * 2;
                let to_col = col as i32 + dc * 2;
                if !(0..8).contains(&to_row) || !(0..8).contains(&to_col) {
                    continue;
                }
                let mid = board[mid_row as usize][mid_col as usize];
                let landing = board[to_row as usize][to_col as usize];
                if landing.is_none() && mid.is_some_and(|m| m.color != color) {
                    captures.push((
                        Coord::new(row, col),
                        Coord::new(to_row as usize, to_col as usize),
                    ));
                }
            }
        }
    }
    captures
}

/// A color with zero pieces left has lost.
fn winner_by_elimination(board: &Board) -> Option<usize> {
    let mut black = 0;
    let mut red = 0;
    for piece in board.iter().flatten().flatten() {
        match piece.color {
            CheckersColor::Black => black += 1,
            CheckersColor::Red => red += 1,
        }
    }
    if black == 0 {
        Some(1)
    } else if red == 0 {
        Some(0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ctx(seat: usize) -> TurnCtx<'static> {
        TurnCtx {
            seat,
            username: if seat == 0 { "Alice" } else { "Bob" },
            names: ["Alice", "Bob"],
        }
    }

    fn init() -> GameState {
        Checkers.init(&mut StdRng::seed_from_u64(0))
    }

    fn mv(state: &mut GameState, seat: usize, from: (usize, usize), to: (usize, usize)) -> Option<Outcome> {
        let mut rng = StdRng::seed_from_u64(0);
        Checkers.process_action(
            &ctx(seat),
            state,
            &GameAction::Move {
                from: Coord::new(from.0, from.1),
                to: Coord::new(to.0, to.1),
                promotion: None,
            },
            &mut rng,
        )
    }

    fn piece(color: CheckersColor, is_king: bool) -> Option<CheckersPiece> {
        Some(CheckersPiece { color, is_king })
    }

    fn bare_state(board: Board, current_turn: usize) -> GameState {
        GameState::Checkers(CheckersState {
            board,
            current_turn,
        })
    }

    #[test]
    fn init_places_twelve_pieces_per_color_on_dark_squares() {
        let GameState::Checkers(s) = init() else {
            panic!("wrong variant");
        };
        let mut black = 0;
        let mut red = 0;
        for (r, row) in s.board.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if let Some(p) = cell {
                    assert_eq!((r + c) % 2, 1);
                    match p.color {
                        CheckersColor::Black => black += 1,
                        CheckersColor::Red => red += 1,
                    }
                }
            }
        }
        assert_eq!(black, 12);
        assert_eq!(red, 12);
        assert_eq!(s.current_turn, 0);
    }

    #[test]
    fn black_advances_toward_row_zero() {
        let mut state = init();
        assert!(mv(&mut state, 0, (5, 0), (4, 1)).is_some());
        let GameState::Checkers(s) = &state else {
            panic!("wrong variant");
        };
        assert!(s.board[4][1].is_some());
        assert!(s.board[5][0].is_none());
        assert_eq!(s.current_turn, 1);
    }

    #[test]
    fn non_king_cannot_move_backwards() {
        let mut state = init();
        mv(&mut state, 0, (5, 0), (4, 1));
        mv(&mut state, 1, (2, 1), (3, 0));
        // Black trying to step back down is rejected.
        assert!(mv(&mut state, 0, (4, 1), (5, 0)).is_none());
    }

    #[test]
    fn simple_move_rejected_while_any_capture_exists() {
        let mut board: Board = [[None; 8]; 8];
        board[4][3] = piece(CheckersColor::Black, false);
        board[3][4] = piece(CheckersColor::Red, false);
        board[6][1] = piece(CheckersColor::Black, false);
        let mut state = bare_state(board, 0);

        // (6,1) -> (5,0) is a plain step, but black has a jump at (4,3).
        assert!(mv(&mut state, 0, (6, 1), (5, 0)).is_none());
        // The capture itself is accepted and removes the jumped piece.
        assert!(mv(&mut state, 0, (4, 3), (2, 5)).is_some());
        let GameState::Checkers(s) = &state else {
            panic!("wrong variant");
        };
        assert!(s.board[3][4].is_none());
        assert!(s.board[2][5].is_some());
    }

    #[test]
    fn capture_requires_an_enemy_in_between() {
        let mut board: Board = [[None; 8]; 8];
        board[4][3] = piece(CheckersColor::Black, false);
        board[3][4] = piece(CheckersColor::Black, false);
        let mut state = bare_state(board, 0);
        assert!(mv(&mut state, 0, (4, 3), (2, 5)).is_none());
    }

    #[test]
    fn reaching_the_far_row_promotes_to_king() {
        let mut board: Board = [[None; 8]; 8];
        board[1][2] = piece(CheckersColor::Black, false);
        board[5][5] = piece(CheckersColor::Red, false);
        let mut state = bare_state(board, 0);
        assert!(mv(&mut state, 0, (1, 2), (0, 1)).is_some());
        let GameState::Checkers(s) = &state else {
            panic!("wrong variant");
        };
        assert!(s.board[0][1].unwrap().is_king);
    }

    #[test]
    fn king_moves_in_all_four_diagonals() {
        let mut board: Board = [[None; 8]; 8];
        board[4][3] = piece(CheckersColor::Black, true);
        board[0][1] = piece(CheckersColor::Red, false);
        let mut state = bare_state(board, 0);
        assert!(mv(&mut state, 0, (4, 3), (5, 4)).is_some());
    }

    #[test]
    fn capturing_the_last_piece_wins() {
        let mut board: Board = [[None; 8]; 8];
        board[4][3] = piece(CheckersColor::Black, false);
        board[3][4] = piece(CheckersColor::Red, false);
        let mut state = bare_state(board, 0);
        let outcome = mv(&mut state, 0, (4, 3), (2, 5)).unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.winner, Some(0));
        assert_eq!(outcome.winner_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn turn_flips_unconditionally_after_a_capture() {
        let mut board: Board = [[None; 8]; 8];
        board[4][3] = piece(CheckersColor::Black, false);
        board[3][4] = piece(CheckersColor::Red, false);
        board[1][6] = piece(CheckersColor::Red, false);
        let mut state = bare_state(board, 0);
        assert!(mv(&mut state, 0, (4, 3), (2, 5)).is_some());
        let GameState::Checkers(s) = &state else {
            panic!("wrong variant");
        };
        // No multi-jump chaining: red is on turn even though black could
        // jump again.
        assert_eq!(s.current_turn, 1);
    }
}
