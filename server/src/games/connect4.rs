//! Connect-4: 6×7 grid, discs fall to the lowest empty row of a column.

use rand::RngCore;
use shared::{Connect4State, Coord, Disc, GameAction, GameKind, GameState, Outcome};

use crate::registry::{GameMeta, GameModule, TurnCtx};

const META: GameMeta = GameMeta {
    kind: GameKind::Connect4,
    label: "Connect 4",
    icon: "🔴",
    min_players: 2,
    max_players: 2,
};

const ROWS: usize = 6;
const COLS: usize = 7;

pub struct Connect4;

impl GameModule for Connect4 {
    fn meta(&self) -> &GameMeta {
        &META
    }

    fn init(&self, _rng: &mut dyn RngCore) -> GameState {
        GameState::Connect4(Connect4State {
            board: [[None; COLS]; ROWS],
            current_turn: 0,
            last_move: None,
        })
    }

    fn process_action(
        &self,
        ctx: &TurnCtx<'_>,
        state: &mut GameState,
        action: &GameAction,
        _rng: &mut dyn RngCore,
    ) -> Option<Outcome> {
        let GameState::Connect4(s) = state else {
            return None;
        };
        let GameAction::Drop { col } = *action else {
            return None;
        };
        if s.current_turn != ctx.seat || col >= COLS {
            return None;
        }

        // Gravity: first empty row scanning up from the bottom.
        let row = (0..ROWS).rev().find(|&r| s.board[r][col].is_none())?;

        let disc = if ctx.seat == 0 { Disc::Red } else { Disc::Yellow };
        s.board[row][col] = Some(disc);
        s.last_move = Some(Coord::new(row, col));

        if let Some(cells) = winning_run(&s.board, row, col) {
            let mut outcome = Outcome::win(ctx.seat, ctx.username);
            outcome.win_cells = Some(cells);
            return Some(outcome);
        }

        if s.board[0].iter().all(|c| c.is_some()) {
            return Some(Outcome::draw());
        }

        s.current_turn = 1 - s.current_turn;
        Some(Outcome::ongoing())
    }
}

/// Walks both signs of each of the four directions from the just-placed disc
/// and collects a run of at least four.
fn winning_run(board: &[[Option<Disc>; COLS]; ROWS], row: usize, col: usize) -> Option<Vec<Coord>> {
    let disc = board[row][col];
    for (dr, dc) in [(0i32, 1i32), (1, 0), (1, 1), (1, -1)] {
        let mut cells = vec![Coord::new(row, col)];
        for sign in [1i32, -1] {
            for i in 1..4 {
                let r = row as i32 + dr * sign * i;
                let c = col as i32 + dc * sign * i;
                if r < 0 || r >= ROWS as i32 || c < 0 || c >= COLS as i32 {
                    break;
                }
                if board[r as usize][c as usize] != disc {
                    break;
                }
                cells.push(Coord::new(r as usize, c as usize));
            }
        }
        if cells.len() >= 4 {
            return Some(cells);
        }
    }
    None
}
