//! Game registry: the uniform contract every rule module implements, and the
//! table that maps a [`GameKind`] to its module.
//!
//! Modules are registered once at startup; the room layer only ever talks to
//! the [`GameModule`] trait and never special-cases a game.

use std::collections::HashMap;

use log::info;
use rand::RngCore;
use shared::{GameAction, GameKind, GameState, GameTypeInfo, Outcome, Seat};

use crate::games;

/// Immutable metadata describing one game type.
#[derive(Debug, Clone, Copy)]
pub struct GameMeta {
    pub kind: GameKind,
    pub label: &'static str,
    pub icon: &'static str,
    pub min_players: usize,
    pub max_players: usize,
}

/// Per-action context handed to a rule module: who is acting and the
/// usernames seated at each of the two seats.
pub struct TurnCtx<'a> {
    pub seat: Seat,
    pub username: &'a str,
    pub names: [&'a str; 2],
}

impl<'a> TurnCtx<'a> {
    pub fn name_of(&self, seat: Seat) -> &'a str {
        self.names[seat]
    }
}

/// Rule engine for one game.
///
/// `process_action` validates against the current state and the acting seat;
/// `None` means rejected with no state change. On acceptance the state has
/// been mutated in place and the returned envelope describes the result.
pub trait GameModule: Send + Sync {
    fn meta(&self) -> &GameMeta;

    fn init(&self, rng: &mut dyn RngCore) -> GameState;

    fn process_action(
        &self,
        ctx: &TurnCtx<'_>,
        state: &mut GameState,
        action: &GameAction,
        rng: &mut dyn RngCore,
    ) -> Option<Outcome>;
}

/// All registered game modules, built once at process start.
pub struct GameRegistry {
    modules: HashMap<GameKind, Box<dyn GameModule>>,
}

impl GameRegistry {
    pub fn new() -> Self {
        let mut modules: HashMap<GameKind, Box<dyn GameModule>> = HashMap::new();
        let all: Vec<Box<dyn GameModule>> = vec![
            Box::new(games::checkers::Checkers),
            Box::new(games::chess::Chess),
            Box::new(games::connect4::Connect4),
            Box::new(games::gomoku::Gomoku),
            Box::new(games::password::Password),
            Box::new(games::reversi::Reversi),
            Box::new(games::tictactoe::TicTacToe),
            Box::new(games::wheel::WheelOfFortune),
        ];
        for module in all {
            let meta = *module.meta();
            info!("game registered: {} ({})", meta.kind, meta.label);
            modules.insert(meta.kind, module);
        }
        Self { modules }
    }

    pub fn lookup(&self, kind: GameKind) -> Option<&dyn GameModule> {
        self.modules.get(&kind).map(|m| m.as_ref())
    }

    /// Metadata listing in stable registry order.
    pub fn list(&self) -> Vec<GameTypeInfo> {
        GameKind::ALL
            .iter()
            .filter_map(|kind| self.modules.get(kind))
            .map(|module| {
                let meta = module.meta();
                GameTypeInfo {
                    id: meta.kind,
                    label: meta.label.to_string(),
                    icon: meta.icon.to_string(),
                    min_players: meta.min_players,
                    max_players: meta.max_players,
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}
