//! Tic-tac-toe: 3×3 board as 9 linear cells, 8 fixed winning lines.

use rand::RngCore;
use shared::{GameAction, GameKind, GameState, Mark, Outcome, TicTacToeState};

use crate::registry::{GameMeta, GameModule, TurnCtx};

const META: GameMeta = GameMeta {
    kind: GameKind::TicTacToe,
    label: "Tic-Tac-Toe",
    icon: "✕○",
    min_players: 2,
    max_players: 2,
};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub struct TicTacToe;

impl GameModule for TicTacToe {
    fn meta(&self) -> &GameMeta {
        &META
    }

    fn init(&self, _rng: &mut dyn RngCore) -> GameState {
        GameState::TicTacToe(TicTacToeState {
            board: [None; 9],
            current_turn: 0,
            moves: Vec::new(),
        })
    }

    fn process_action(
        &self,
        ctx: &TurnCtx<'_>,
        state: &mut GameState,
        action: &GameAction,
        _rng: &mut dyn RngCore,
    ) -> Option<Outcome> {
        let GameState::TicTacToe(s) = state else {
            return None;
        };
        let GameAction::Place { index } = *action else {
            return None;
        };
        if s.current_turn != ctx.seat {
            return None;
        }
        if index >= 9 || s.board[index].is_some() {
            return None;
        }

        let mark = if ctx.seat == 0 { Mark::X } else { Mark::O };
        s.board[index] = Some(mark);
        s.moves.push((ctx.seat, index));

        if let Some(pattern) = winning_line(&s.board) {
            let mut outcome = Outcome::win(ctx.seat, ctx.username);
            outcome.win_pattern = Some(pattern.to_vec());
            return Some(outcome);
        }

        if s.board.iter().all(|c| c.is_some()) {
            return Some(Outcome::draw());
        }

        s.current_turn = 1 - s.current_turn;
        Some(Outcome::ongoing())
    }
}

fn winning_line(board: &[Option<Mark>; 9]) -> Option<[usize; 3]> {
    LINES
        .iter()
        .find(|[a, b, c]| board[*a].is_some() && board[*a] == board[*b] && board[*a] == board[*c])
        .copied()
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
        TicTacToe.init(&mut StdRng::seed_from_u64(0))
    }

    fn play(state: &mut GameState, seat: usize, index: usize) -> Option<Outcome> {
        let mut rng = StdRng::seed_from_u64(0);
        TicTacToe.process_action(&ctx(seat), state, &GameAction::Place { index }, &mut rng)
    }

    fn play_moves(moves: &[(usize, usize)]) -> (GameState, Option<Outcome>) {
        let mut state = init();
        let mut last = None;
        for &(seat, index) in moves {
            last = play(&mut state, seat, index);
        }
        (state, last)
    }

    #[test]
    fn init_returns_empty_board_on_seat_zero_turn() {
        let GameState::TicTacToe(s) = init() else {
            panic!("wrong variant");
        };
        assert!(s.board.iter().all(|c| c.is_none()));
        assert_eq!(s.current_turn, 0);
        assert!(s.moves.is_empty());
    }

    #[test]
    fn rejects_move_from_wrong_seat() {
        let mut state = init();
        assert!(play(&mut state, 1, 0).is_none());
    }

    #[test]
    fn rejects_occupied_and_out_of_range_cells() {
        let mut state = init();
        assert!(play(&mut state, 0, 4).is_some());
        assert!(play(&mut state, 1, 4).is_none());
        assert!(play(&mut state, 1, 9).is_none());
    }

    #[test]
    fn repeated_illegal_move_never_mutates_state() {
        let mut state = init();
        play(&mut state, 0, 4);
        for _ in 0..2 {
            assert!(play(&mut state, 1, 4).is_none());
            let GameState::TicTacToe(s) = &state else {
                panic!("wrong variant");
            };
            assert_eq!(s.board[4], Some(Mark::X));
            assert_eq!(s.current_turn, 1);
            assert_eq!(s.moves.len(), 1);
        }
    }

    #[test]
    fn detects_top_row_win_with_pattern() {
        let (_, result) = play_moves(&[(0, 0), (1, 3), (0, 1), (1, 4), (0, 2)]);
        let outcome = result.unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.winner, Some(0));
        assert_eq!(outcome.winner_name.as_deref(), Some("Alice"));
        assert_eq!(outcome.win_pattern, Some(vec![0, 1, 2]));
    }

    #[test]
    fn detects_column_and_diagonal_wins() {
        let (_, col) = play_moves(&[(0, 0), (1, 1), (0, 3), (1, 2), (0, 6)]);
        assert_eq!(col.unwrap().winner, Some(0));

        let (_, diag) = play_moves(&[(0, 0), (1, 1), (0, 4), (1, 2), (0, 8)]);
        assert_eq!(diag.unwrap().winner, Some(0));

        let (_, anti) = play_moves(&[(0, 2), (1, 0), (0, 4), (1, 1), (0, 6)]);
        assert_eq!(anti.unwrap().winner, Some(0));
    }

    #[test]
    fn detects_full_board_draw() {
        let (_, result) = play_moves(&[
            (0, 0),
            (1, 1),
            (0, 2),
            (1, 5),
            (0, 3),
            (1, 6),
            (0, 4),
            (1, 8),
            (0, 7),
        ]);
        let outcome = result.unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.winner, None);
    }

    #[test]
    fn turn_alternates_after_each_accepted_move() {
        let mut state = init();
        play(&mut state, 0, 0);
        let GameState::TicTacToe(s) = &state else {
            panic!("wrong variant");
        };
        assert_eq!(s.current_turn, 1);
        play(&mut state, 1, 1);
        let GameState::TicTacToe(s) = &state else {
            panic!("wrong variant");
        };
        assert_eq!(s.current_turn, 0);
    }
}
