//! Reversi (Othello). Seat 0 plays black and moves first from the standard
//! four-disc start. Legality is precomputed into `valid_moves` after every
//! accepted placement; a seat with no legal move passes automatically.

use rand::RngCore;
use shared::{Coord, GameAction, GameKind, GameState, Outcome, ReversiState, Stone};

use crate::registry::{GameMeta, GameModule, TurnCtx};

const META: GameMeta = GameMeta {
    kind: GameKind::Reversi,
    label: "Reversi",
    icon: "⬤",
    min_players: 2,
    max_players: 2,
};

const DIRS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

type Board = [[Option<Stone>; 8]; 8];

pub struct Reversi;

impl GameModule for Reversi {
    fn meta(&self) -> &GameMeta {
        &META
    }

    fn init(&self, _rng: &mut dyn RngCore) -> GameState {
        let mut board: Board = [[None; 8]; 8];
        board[3][3] = Some(Stone::White);
        board[3][4] = Some(Stone::Black);
        board[4][3] = Some(Stone::Black);
        board[4][4] = Some(Stone::White);
        GameState::Reversi(ReversiState {
            valid_moves: valid_moves(&board, Stone::Black),
            board,
            current_turn: 0,
            scores: (2, 2),
        })
    }

    fn process_action(
        &self,
        ctx: &TurnCtx<'_>,
        state: &mut GameState,
        action: &GameAction,
        _rng: &mut dyn RngCore,
    ) -> Option<Outcome> {
        let GameState::Reversi(s) = state else {
            return None;
        };
        let GameAction::PlaceAt { row, col } = *action else {
            return None;
        };
        if s.current_turn != ctx.seat {
            return None;
        }

        let color = seat_color(ctx.seat);
        if !s.valid_moves.iter().any(|m| m.row == row && m.col == col) {
            return None;
        }

        s.board[row][col] = Some(color);
        for cell in flips(&s.board, row, col, color) {
            s.board[cell.row][cell.col] = Some(color);
        }

        s.current_turn = 1 - s.current_turn;
        let next_color = seat_color(s.current_turn);
        let mut next_moves = valid_moves(&s.board, next_color);

        if next_moves.is_empty() {
            // The mover may still have moves; if so the opponent passes.
            s.current_turn = 1 - s.current_turn;
            let prev_moves = valid_moves(&s.board, color);
            if prev_moves.is_empty() {
                // Neither side can move.
                s.scores = count_scores(&s.board);
                s.valid_moves.clear();
                let (black, white) = s.scores;
                return Some(match black.cmp(&white) {
                    std::cmp::Ordering::Greater => Outcome::win(0, ctx.name_of(0)),
                    std::cmp::Ordering::Less => Outcome::win(1, ctx.name_of(1)),
                    std::cmp::Ordering::Equal => Outcome::draw(),
                });
            }
            next_moves = prev_moves;
        }

        s.valid_moves = next_moves;
        s.scores = count_scores(&s.board);
        Some(Outcome::ongoing())
    }
}

fn seat_color(seat: usize) -> Stone {
    if seat == 0 {
        Stone::Black
    } else {
        Stone::White
    }
}

/// Every opposing disc that placing `color` at (row, col) would flip: for
/// each direction, the contiguous enemy run terminated by an own disc.
fn flips(board: &Board, row: usize, col: usize, color: Stone) -> Vec<Coord> {
    let enemy = color.opponent();
    let mut result = Vec::new();
    for (dr, dc) in DIRS {
        let mut line = Vec::new();
        for i in 1..8 {
            let r = row as i32 + dr * i;
            let c = col as i32 + dc * i;
            if !(0..8).contains(&r) || !(0..8).contains(&c) {
                break;
            }
            match board[r as usize][c as usize] {
                Some(stone) if stone == enemy => line.push(Coord::new(r as usize, c as usize)),
                Some(_) => {
                    result.extend(line);
                    break;
                }
                None => break,
            }
        }
    }
    result
}

fn valid_moves(board: &Board, color: Stone) -> Vec<Coord> {
    let mut moves = Vec::new();
    for r in 0..8 {
        for c in 0..8 {
            if board[r][c].is_none() && !flips(board, r, c, color).is_empty() {
                moves.push(Coord::new(r, c));
            }
        }
    }
    moves
}

fn count_scores(board: &Board) -> (u32, u32) {
    let mut black = 0;
    let mut white = 0;
    for cell in board.iter().flatten() {
        match cell {
            Some(Stone::Black) => black += 1,
            Some(Stone::White) => white += 1,
            None => {}
        }
    }
    (black, white)
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
        Reversi.init(&mut StdRng::seed_from_u64(0))
    }

    fn place(state: &mut GameState, seat: usize, row: usize, col: usize) -> Option<Outcome> {
        let mut rng = StdRng::seed_from_u64(0);
        Reversi.process_action(&ctx(seat), state, &GameAction::PlaceAt { row, col }, &mut rng)
    }

    #[test]
    fn init_has_standard_position_and_four_openings() {
        let GameState::Reversi(s) = init() else {
            panic!("wrong variant");
        };
        assert_eq!(s.board[3][3], Some(Stone::White));
        assert_eq!(s.board[4][4], Some(Stone::White));
        assert_eq!(s.board[3][4], Some(Stone::Black));
        assert_eq!(s.board[4][3], Some(Stone::Black));
        assert_eq!(s.scores, (2, 2));
        let mut moves = s.valid_moves.clone();
        moves.sort_by_key(|m| (m.row, m.col));
        assert_eq!(
            moves,
            vec![
                Coord::new(2, 3),
                Coord::new(3, 2),
                Coord::new(4, 5),
                Coord::new(5, 4),
            ]
        );
    }

    #[test]
    fn rejects_placement_outside_valid_moves() {
        let mut state = init();
        assert!(place(&mut state, 0, 0, 0).is_none());
        assert!(place(&mut state, 0, 3, 3).is_none());
    }

    #[test]
    fn placement_flips_exactly_the_enclosed_run() {
        let mut state = init();
        assert!(place(&mut state, 0, 2, 3).is_some());
        let GameState::Reversi(s) = &state else {
            panic!("wrong variant");
        };
        // (3,3) flips to black; nothing else changes color.
        assert_eq!(s.board[2][3], Some(Stone::Black));
        assert_eq!(s.board[3][3], Some(Stone::Black));
        assert_eq!(s.board[4][4], Some(Stone::White));
        assert_eq!(s.scores, (4, 1));
        assert_eq!(s.current_turn, 1);
    }

    #[test]
    fn flip_helper_requires_a_terminating_own_disc() {
        let mut board: Board = [[None; 8]; 8];
        board[0][1] = Some(Stone::White);
        board[0][2] = Some(Stone::White);
        // No black terminator to the left: placing black at (0,3) flips nothing.
        assert!(flips(&board, 0, 3, Stone::Black).is_empty());

        board[0][0] = Some(Stone::Black);
        let mut run = flips(&board, 0, 3, Stone::Black);
        run.sort_by_key(|m| m.col);
        assert_eq!(run, vec![Coord::new(0, 1), Coord::new(0, 2)]);
    }

    #[test]
    fn blocked_opponent_passes_back_to_mover() {
        // After black plays (0,2), white has no legal reply anywhere but
        // black can still take (7,0).
        let mut board: Board = [[None; 8]; 8];
        board[0][0] = Some(Stone::Black);
        board[0][1] = Some(Stone::White);
        board[7][1] = Some(Stone::White);
        board[7][2] = Some(Stone::White);
        for col in 3..8 {
            board[7][col] = Some(Stone::Black);
        }
        let mut state = GameState::Reversi(ReversiState {
            valid_moves: valid_moves(&board, Stone::Black),
            board,
            current_turn: 0,
            scores: count_scores(&board),
        });

        let outcome = place(&mut state, 0, 0, 2).unwrap();
        assert!(!outcome.game_over);
        let GameState::Reversi(s) = &state else {
            panic!("wrong variant");
        };
        assert_eq!(s.current_turn, 0);
        assert!(s.valid_moves.contains(&Coord::new(7, 0)));
    }

    #[test]
    fn double_block_ends_game_on_disc_count() {
        // Final placement fills the board; neither side can move afterwards.
        let mut board: Board = [[Some(Stone::Black); 8]; 8];
        board[0][0] = None;
        board[0][1] = Some(Stone::White);
        let mut state = GameState::Reversi(ReversiState {
            valid_moves: vec![Coord::new(0, 0)],
            board,
            current_turn: 0,
            scores: count_scores(&board),
        });
        let outcome = place(&mut state, 0, 0, 0).unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.winner, Some(0));
        assert_eq!(outcome.winner_name.as_deref(), Some("Alice"));
    }
}
