//! Gomoku (five-in-a-row) on a 15×15 Go-style board. Seat 0 plays black and
//! moves first.

use rand::RngCore;
use shared::{Coord, GameAction, GameKind, GameState, GomokuState, Outcome, Stone};

use crate::registry::{GameMeta, GameModule, TurnCtx};

const META: GameMeta = GameMeta {
    kind: GameKind::Gomoku,
    label: "Gomoku",
    icon: "⚫",
    min_players: 2,
    max_players: 2,
};

const SIZE: usize = 15;

pub struct Gomoku;

impl GameModule for Gomoku {
    fn meta(&self) -> &GameMeta {
        &META
    }

    fn init(&self, _rng: &mut dyn RngCore) -> GameState {
        GameState::Gomoku(GomokuState {
            board: [[None; SIZE]; SIZE],
            current_turn: 0,
            last_move: None,
            move_count: 0,
        })
    }

    fn process_action(
        &self,
        ctx: &TurnCtx<'_>,
        state: &mut GameState,
        action: &GameAction,
        _rng: &mut dyn RngCore,
    ) -> Option<Outcome> {
        let GameState::Gomoku(s) = state else {
            return None;
        };
        let GameAction::PlaceAt { row, col } = *action else {
            return None;
        };
        if s.current_turn != ctx.seat {
            return None;
        }
        if row >= SIZE || col >= SIZE || s.board[row][col].is_some() {
            return None;
        }

        let stone = if ctx.seat == 0 {
            Stone::Black
        } else {
            Stone::White
        };
        s.board[row][col] = Some(stone);
        s.last_move = Some(Coord::new(row, col));
        s.move_count += 1;

        if let Some(cells) = winning_run(&s.board, row, col, stone) {
            let mut outcome = Outcome::win(ctx.seat, ctx.username);
            outcome.win_cells = Some(cells);
            return Some(outcome);
        }

        if s.move_count == SIZE * SIZE {
            return Some(Outcome::draw());
        }

        s.current_turn = 1 - s.current_turn;
        Some(Outcome::ongoing())
    }
}

fn winning_run(
    board: &[[Option<Stone>; SIZE]; SIZE],
    row: usize,
    col: usize,
    stone: Stone,
) -> Option<Vec<Coord>> {
    for (dr, dc) in [(0i32, 1i32), (1, 0), (1, 1), (1, -1)] {
        let mut cells = vec![Coord::new(row, col)];
        for sign in [1i32, -1] {
            for i in 1..5 {
                let r = row as i32 + dr * sign * i;
                let c = col as i32 + dc * sign * i;
                if r < 0 || r >= SIZE as i32 || c < 0 || c >= SIZE as i32 {
                    break;
                }
                if board[r as usize][c as usize] != Some(stone) {
                    break;
                }
                cells.push(Coord::new(r as usize, c as usize));
            }
        }
        if cells.len() >= 5 {
            return Some(cells);
        }
    }
    None
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
        Gomoku.init(&mut StdRng::seed_from_u64(0))
    }

    fn place(state: &mut GameState, seat: usize, row: usize, col: usize) -> Option<Outcome> {
        let mut rng = StdRng::seed_from_u64(0);
        Gomoku.process_action(&ctx(seat), state, &GameAction::PlaceAt { row, col }, &mut rng)
    }

    #[test]
    fn init_is_empty_black_to_move() {
        let GameState::Gomoku(s) = init() else {
            panic!("wrong variant");
        };
        assert_eq!(s.current_turn, 0);
        assert_eq!(s.move_count, 0);
        assert!(s.board.iter().flatten().all(|c| c.is_none()));
    }

    #[test]
    fn rejects_out_of_bounds_and_occupied() {
        let mut state = init();
        assert!(place(&mut state, 0, 15, 0).is_none());
        assert!(place(&mut state, 0, 0, 15).is_none());
        assert!(place(&mut state, 0, 7, 7).is_some());
        assert!(place(&mut state, 1, 7, 7).is_none());
    }

    #[test]
    fn five_in_a_row_wins() {
        let mut state = init();
        for i in 0..4 {
            assert!(!place(&mut state, 0, 7, i).unwrap().game_over);
            assert!(!place(&mut state, 1, 8, i).unwrap().game_over);
        }
        let outcome = place(&mut state, 0, 7, 4).unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.winner, Some(0));
        assert_eq!(outcome.win_cells.as_ref().unwrap().len(), 5);
    }

    #[test]
    fn diagonal_run_built_from_both_sides_wins() {
        let mut state = init();
        // Black fills (5,5) (6,6) (8,8) (9,9) then closes the gap at (7,7).
        let blacks = [(5, 5), (6, 6), (8, 8), (9, 9)];
        let whites = [(0, 0), (0, 1), (0, 2), (0, 3)];
        for i in 0..4 {
            place(&mut state, 0, blacks[i].0, blacks[i].1);
            place(&mut state, 1, whites[i].0, whites[i].1);
        }
        let outcome = place(&mut state, 0, 7, 7).unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.winner, Some(0));
    }

    #[test]
    fn turn_alternates() {
        let mut state = init();
        place(&mut state, 0, 0, 0);
        let GameState::Gomoku(s) = &state else {
            panic!("wrong variant");
        };
        assert_eq!(s.current_turn, 1);
    }
}
