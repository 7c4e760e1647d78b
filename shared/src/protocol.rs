//! Wire protocol between clients and the room server.
//!
//! Every datagram carries exactly one bincode-encoded [`Packet`]. The first
//! half of the enum is the client call surface; the second half is the set of
//! events the server delivers back, either to one connection or fanned out to
//! a room's participants.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::games::{GameAction, GameKind, GameState, Outcome};
use crate::{ClientId, RoomId, Seat};

/// Cosmetic difficulty tag attached to a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// Room membership record as seen by clients. `seat` is `None` for
/// spectators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: ClientId,
    pub username: String,
    pub avatar: String,
    pub seat: Option<Seat>,
    pub is_ready: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender_id: ClientId,
    pub sender_name: String,
    pub sender_avatar: String,
    pub content: String,
    pub timestamp: u64,
}

/// Game metadata row sent to clients for the game picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameTypeInfo {
    pub id: GameKind,
    pub label: String,
    pub icon: String,
    pub min_players: usize,
    pub max_players: usize,
}

/// One row of the lobby's room browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
    pub game_type: GameKind,
    pub game_label: String,
    pub game_icon: String,
    pub level: SkillLevel,
    pub max_players: usize,
    pub is_private: bool,
    pub player_count: usize,
    pub spectator_count: usize,
    pub game_started: bool,
    pub created_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Packet {
    // Client -> server
    Register {
        username: String,
        avatar: String,
    },
    Heartbeat,
    ListRooms,
    CreateRoom {
        name: String,
        game_type: GameKind,
        level: SkillLevel,
        is_private: bool,
        password: Option<String>,
    },
    JoinRoom {
        room_id: RoomId,
        password: Option<String>,
    },
    LeaveRoom,
    Chat {
        content: String,
    },
    Ready,
    Action(GameAction),
    Rematch,
    Disconnect,

    // Server -> client
    Registered {
        game_types: Vec<GameTypeInfo>,
    },
    RoomsList {
        rooms: Vec<RoomSummary>,
    },
    RoomJoined {
        room: RoomSummary,
        players: Vec<PlayerInfo>,
        spectators: Vec<PlayerInfo>,
        chat_history: Vec<ChatMessage>,
        seat: Option<Seat>,
        game_state: Option<GameState>,
        game_started: bool,
    },
    PlayerJoined {
        player: PlayerInfo,
        players: Vec<PlayerInfo>,
        spectators: Vec<PlayerInfo>,
    },
    PlayerLeft {
        player_id: ClientId,
        players: Vec<PlayerInfo>,
        spectators: Vec<PlayerInfo>,
    },
    ChatBroadcast(ChatMessage),
    ReadyUpdate {
        players: Vec<PlayerInfo>,
    },
    GameStarted {
        game_type: GameKind,
        state: GameState,
        players: Vec<PlayerInfo>,
    },
    GameUpdate {
        state: GameState,
        outcome: Outcome,
    },
    GameAborted {
        reason: String,
    },
    RematchOffer {
        from_name: String,
    },
    Error {
        message: String,
    },
}
