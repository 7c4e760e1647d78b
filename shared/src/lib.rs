//! Types shared between the gaming-rooms server and its clients: the wire
//! protocol (bincode-encoded [`Packet`]s) and the per-game state payloads
//! that travel inside it.

pub mod games;
pub mod protocol;

pub use games::{
    CastlingFlags, CheckersColor, CheckersPiece, CheckersState, ChessColor, ChessMove, ChessPiece,
    ChessState,
    ClueEntry, Connect4State, Coord, Disc, GameAction, GameKind, GameState, GomokuState,
    GuessResult, Mark, Outcome, PasswordPhase, PasswordState, PieceKind, ReversiState, SpinResult,
    Stone, TicTacToeState, WheelPhase, WheelState,
};
pub use protocol::{ChatMessage, GameTypeInfo, Packet, PlayerInfo, RoomSummary, SkillLevel};

/// Connection-scoped client identity assigned by the server.
pub type ClientId = u32;

/// Room identifier.
pub type RoomId = uuid::Uuid;

/// A player slot within a room: 0 or 1.
pub type Seat = usize;

pub const MAX_USERNAME_LEN: usize = 20;
pub const MAX_ROOM_NAME_LEN: usize = 40;
pub const MAX_CHAT_LEN: usize = 500;
pub const MAX_PASSWORD_LEN: usize = 72;
pub const CHAT_HISTORY_CAP: usize = 200;
