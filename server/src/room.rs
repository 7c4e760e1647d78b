//! The room aggregate: one match's complete social and game state, covering
//! the roster, spectators, chat backlog, current game, and lifecycle flags.

use std::collections::VecDeque;

use shared::{
    ChatMessage, ClientId, GameKind, GameState, PlayerInfo, RoomId, RoomSummary, Seat, SkillLevel,
    CHAT_HISTORY_CAP,
};
use uuid::Uuid;

use crate::utils::get_timestamp;

pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub game_type: GameKind,
    pub level: SkillLevel,
    pub max_players: usize,
    pub is_private: bool,
    /// bcrypt hash; plaintext is never stored.
    pub password_hash: Option<String>,
    pub players: Vec<PlayerInfo>,
    pub spectators: Vec<PlayerInfo>,
    pub chat_history: VecDeque<ChatMessage>,
    pub game_state: Option<GameState>,
    pub game_started: bool,
    pub created_at: u64,
}

impl Room {
    pub fn new(
        name: String,
        game_type: GameKind,
        level: SkillLevel,
        max_players: usize,
        is_private: bool,
        password_hash: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            game_type,
            level,
            max_players,
            is_private,
            password_hash,
            players: Vec::new(),
            spectators: Vec::new(),
            chat_history: VecDeque::new(),
            game_state: None,
            game_started: false,
            created_at: get_timestamp(),
        }
    }

    /// Public rooms always pass; private rooms compare against the stored
    /// bcrypt hash.
    pub fn check_password(&self, supplied: Option<&str>) -> bool {
        if !self.is_private {
            return true;
        }
        let (Some(supplied), Some(hash)) = (supplied, self.password_hash.as_ref()) else {
            return false;
        };
        bcrypt::verify(supplied, hash).unwrap_or(false)
    }

    /// Lowest seat index in 0..max_players not currently occupied. Seats are
    /// stable: a leaver's seat stays open until a new player takes it.
    pub fn next_open_seat(&self) -> Option<Seat> {
        (0..self.max_players).find(|seat| !self.players.iter().any(|p| p.seat == Some(*seat)))
    }

    pub fn seated_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, id: ClientId) -> Option<&PlayerInfo> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: ClientId) -> Option<&mut PlayerInfo> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Usernames at seats 0 and 1; `None` unless both seats are occupied.
    pub fn seat_names(&self) -> Option<[&str; 2]> {
        let name_at = |seat: Seat| {
            self.players
                .iter()
                .find(|p| p.seat == Some(seat))
                .map(|p| p.username.as_str())
        };
        Some([name_at(0)?, name_at(1)?])
    }

    pub fn push_chat(&mut self, msg: ChatMessage) {
        self.chat_history.push_back(msg);
        if self.chat_history.len() > CHAT_HISTORY_CAP {
            self.chat_history.pop_front();
        }
    }

    pub fn participant_ids(&self) -> Vec<ClientId> {
        self.players
            .iter()
            .chain(self.spectators.iter())
            .map(|p| p.id)
            .collect()
    }

    pub fn participant_ids_except(&self, excluded: ClientId) -> Vec<ClientId> {
        self.participant_ids()
            .into_iter()
            .filter(|id| *id != excluded)
            .collect()
    }

    /// Removes a player or spectator; true when somebody actually left.
    pub fn remove_member(&mut self, id: ClientId) -> bool {
        let before = self.players.len() + self.spectators.len();
        self.players.retain(|p| p.id != id);
        self.spectators.retain(|p| p.id != id);
        before != self.players.len() + self.spectators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.spectators.is_empty()
    }

    pub fn all_ready(&self) -> bool {
        self.players.iter().all(|p| p.is_ready)
    }

    /// Back to the waiting state: game flags down, ready flags cleared,
    /// state discarded.
    pub fn reset_after_game(&mut self) {
        self.game_started = false;
        self.game_state = None;
        for p in &mut self.players {
            p.is_ready = false;
        }
    }

    pub fn summary(&self, game_label: &str, game_icon: &str) -> RoomSummary {
        RoomSummary {
            id: self.id,
            name: self.name.clone(),
            game_type: self.game_type,
            game_label: game_label.to_string(),
            game_icon: game_icon.to_string(),
            level: self.level,
            max_players: self.max_players,
            is_private: self.is_private,
            player_count: self.players.len(),
            spectator_count: self.spectators.len(),
            game_started: self.game_started,
            created_at: self.created_at,
        }
    }
}
