//! Session/room manager: owns the process-wide user and room tables, routes
//! gameplay actions into the registered rule modules, and sequences each
//! room's lifecycle (waiting → in-progress → ended/aborted → waiting).
//!
//! Methods are synchronous and side-effect free at the transport level: each
//! returns the exact set of deliveries the adapter must fan out, so the
//! manager can be driven directly in tests without any networking.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use uuid::Uuid;

use shared::{
    ChatMessage, ClientId, GameAction, GameKind, Packet, PlayerInfo, RoomId, RoomSummary, Seat,
    SkillLevel, MAX_CHAT_LEN, MAX_PASSWORD_LEN, MAX_ROOM_NAME_LEN, MAX_USERNAME_LEN,
};

use crate::registry::{GameRegistry, TurnCtx};
use crate::room::Room;
use crate::utils::{get_timestamp, truncate_chars};

const BCRYPT_COST: u32 = 10;
const ABORT_REASON: &str = "A player disconnected";
const DEFAULT_AVATAR: &str = "🎮";

/// Connection-scoped identity, independent of room membership.
pub struct User {
    pub id: ClientId,
    pub username: String,
    pub avatar: String,
    pub room: Option<RoomId>,
}

/// Named failure conditions surfaced to the transport layer as user-visible
/// errors. Game-rule rejections never take this path.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Username required")]
    UsernameRequired,
    #[error("Not authenticated")]
    NotRegistered,
    #[error("Already in a room")]
    AlreadyInRoom,
    #[error("Invalid room options")]
    InvalidRoomOptions,
    #[error("Room not found")]
    RoomNotFound,
    #[error("Wrong password")]
    WrongPassword,
}

/// One delivery the transport adapter must perform.
#[derive(Debug)]
pub struct Outbound {
    pub to: Vec<ClientId>,
    pub packet: Packet,
}

impl Outbound {
    pub fn single(to: ClientId, packet: Packet) -> Self {
        Self {
            to: vec![to],
            packet,
        }
    }
}

pub struct SessionManager {
    users: HashMap<ClientId, User>,
    rooms: HashMap<RoomId, Room>,
    registry: GameRegistry,
    rng: StdRng,
}

impl SessionManager {
    pub fn new(registry: GameRegistry) -> Self {
        Self::with_rng(registry, StdRng::from_entropy())
    }

    /// Deterministic variant for tests.
    pub fn with_seed(registry: GameRegistry, seed: u64) -> Self {
        Self::with_rng(registry, StdRng::seed_from_u64(seed))
    }

    fn with_rng(registry: GameRegistry, rng: StdRng) -> Self {
        Self {
            users: HashMap::new(),
            rooms: HashMap::new(),
            registry,
            rng,
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn find_room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn find_user(&self, id: ClientId) -> Option<&User> {
        self.users.get(&id)
    }

    // ── Identity ────────────────────────────────────────────────────────────

    pub fn register(
        &mut self,
        client: ClientId,
        username: &str,
        avatar: &str,
    ) -> Result<Outbound, SessionError> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(SessionError::UsernameRequired);
        }
        let clean = truncate_chars(trimmed, MAX_USERNAME_LEN);
        let avatar = if avatar.is_empty() {
            DEFAULT_AVATAR.to_string()
        } else {
            avatar.to_string()
        };

        let entry = self.users.entry(client).or_insert(User {
            id: client,
            username: String::new(),
            avatar: String::new(),
            room: None,
        });
        entry.username = clean.clone();
        entry.avatar = avatar;
        info!("client {client} registered as {clean:?}");

        Ok(Outbound::single(
            client,
            Packet::Registered {
                game_types: self.registry.list(),
            },
        ))
    }

    // ── Lobby ───────────────────────────────────────────────────────────────

    pub fn list_rooms(&self, client: ClientId) -> Outbound {
        Outbound::single(client, self.rooms_list_packet())
    }

    fn rooms_list_packet(&self) -> Packet {
        let rooms: Vec<RoomSummary> = self
            .rooms
            .values()
            .filter(|r| !r.is_private)
            .map(|r| Self::summarize(&self.registry, r))
            .collect();
        Packet::RoomsList { rooms }
    }

    /// Lobby snapshot to every connected client; sent whenever occupancy or
    /// lifecycle flags change.
    fn rooms_broadcast(&self) -> Outbound {
        Outbound {
            to: self.users.keys().copied().collect(),
            packet: self.rooms_list_packet(),
        }
    }

    fn summarize(registry: &GameRegistry, room: &Room) -> RoomSummary {
        match registry.lookup(room.game_type) {
            Some(module) => room.summary(module.meta().label, module.meta().icon),
            None => room.summary(room.game_type.id(), DEFAULT_AVATAR),
        }
    }

    fn joined_packet(registry: &GameRegistry, room: &Room, seat: Option<Seat>) -> Packet {
        Packet::RoomJoined {
            room: Self::summarize(registry, room),
            players: room.players.clone(),
            spectators: room.spectators.clone(),
            chat_history: room.chat_history.iter().cloned().collect(),
            seat,
            game_state: room.game_state.clone(),
            game_started: room.game_started,
        }
    }

    // ── Room membership ─────────────────────────────────────────────────────

    pub fn create_room(
        &mut self,
        client: ClientId,
        name: &str,
        game_type: GameKind,
        level: SkillLevel,
        is_private: bool,
        password: Option<&str>,
    ) -> Result<Vec<Outbound>, SessionError> {
        let user = self.users.get(&client).ok_or(SessionError::NotRegistered)?;
        if user.room.is_some() {
            return Err(SessionError::AlreadyInRoom);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::InvalidRoomOptions);
        }
        let meta = *self
            .registry
            .lookup(game_type)
            .ok_or(SessionError::InvalidRoomOptions)?
            .meta();

        let password_hash = match password {
            Some(pw) if is_private && !pw.is_empty() => Some(
                bcrypt::hash(truncate_chars(pw, MAX_PASSWORD_LEN), BCRYPT_COST)
                    .map_err(|_| SessionError::InvalidRoomOptions)?,
            ),
            _ => None,
        };

        let mut room = Room::new(
            truncate_chars(name, MAX_ROOM_NAME_LEN),
            game_type,
            level,
            meta.max_players,
            is_private,
            password_hash,
        );
        let user = self
            .users
            .get_mut(&client)
            .ok_or(SessionError::NotRegistered)?;
        room.players.push(PlayerInfo {
            id: client,
            username: user.username.clone(),
            avatar: user.avatar.clone(),
            seat: Some(0),
            is_ready: false,
        });
        user.room = Some(room.id);

        let joined = Self::joined_packet(&self.registry, &room, Some(0));
        info!("room {} created ({}) by client {client}", room.id, game_type);
        self.rooms.insert(room.id, room);

        Ok(vec![
            Outbound::single(client, joined),
            self.rooms_broadcast(),
        ])
    }

    pub fn join_room(
        &mut self,
        client: ClientId,
        room_id: RoomId,
        password: Option<&str>,
    ) -> Result<Vec<Outbound>, SessionError> {
        let Self {
            users,
            rooms,
            registry,
            ..
        } = self;
        let user = users.get_mut(&client).ok_or(SessionError::NotRegistered)?;
        if user.room.is_some() {
            return Err(SessionError::AlreadyInRoom);
        }
        let room = rooms.get_mut(&room_id).ok_or(SessionError::RoomNotFound)?;
        if !room.check_password(password) {
            return Err(SessionError::WrongPassword);
        }

        // Seat while the room is waiting and has an open seat; spectate
        // otherwise.
        let seat = if !room.game_started && room.seated_count() < room.max_players {
            room.next_open_seat()
        } else {
            None
        };
        let player = PlayerInfo {
            id: client,
            username: user.username.clone(),
            avatar: user.avatar.clone(),
            seat,
            is_ready: false,
        };
        let others = room.participant_ids();
        if seat.is_some() {
            room.players.push(player.clone());
        } else {
            room.spectators.push(player.clone());
        }
        user.room = Some(room_id);
        info!(
            "client {client} joined room {room_id} as {}",
            if seat.is_some() { "player" } else { "spectator" }
        );

        let joined = Self::joined_packet(registry, room, seat);
        let notify = Packet::PlayerJoined {
            player,
            players: room.players.clone(),
            spectators: room.spectators.clone(),
        };

        Ok(vec![
            Outbound::single(client, joined),
            Outbound {
                to: others,
                packet: notify,
            },
            self.rooms_broadcast(),
        ])
    }

    pub fn leave_room(&mut self, client: ClientId) -> Vec<Outbound> {
        let Some(user) = self.users.get_mut(&client) else {
            return Vec::new();
        };
        let Some(room_id) = user.room.take() else {
            return Vec::new();
        };
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return Vec::new();
        };
        room.remove_member(client);

        let mut outs = vec![Outbound {
            to: room.participant_ids(),
            packet: Packet::PlayerLeft {
                player_id: client,
                players: room.players.clone(),
                spectators: room.spectators.clone(),
            },
        }];

        // A mid-game departure below two seated players aborts the match.
        if room.game_started && room.seated_count() < 2 {
            room.reset_after_game();
            info!("room {room_id}: game aborted, client {client} left mid-game");
            outs.push(Outbound {
                to: room.participant_ids(),
                packet: Packet::GameAborted {
                    reason: ABORT_REASON.to_string(),
                },
            });
        }

        if room.is_empty() {
            self.rooms.remove(&room_id);
            info!("room {room_id} destroyed (empty)");
        }

        outs.push(self.rooms_broadcast());
        outs
    }

    pub fn disconnect(&mut self, client: ClientId) -> Vec<Outbound> {
        let outs = self.leave_room(client);
        if self.users.remove(&client).is_some() {
            info!("client {client} disconnected");
        }
        outs
    }

    // ── Chat ────────────────────────────────────────────────────────────────

    pub fn chat(&mut self, client: ClientId, content: &str) -> Vec<Outbound> {
        let Some(user) = self.users.get(&client) else {
            return Vec::new();
        };
        let Some(room_id) = user.room else {
            return Vec::new();
        };
        let msg = ChatMessage {
            id: Uuid::new_v4(),
            sender_id: client,
            sender_name: user.username.clone(),
            sender_avatar: user.avatar.clone(),
            content: truncate_chars(content, MAX_CHAT_LEN),
            timestamp: get_timestamp(),
        };
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return Vec::new();
        };
        room.push_chat(msg.clone());
        vec![Outbound {
            to: room.participant_ids(),
            packet: Packet::ChatBroadcast(msg),
        }]
    }

    // ── Ready-up and game start ─────────────────────────────────────────────

    pub fn toggle_ready(&mut self, client: ClientId) -> Vec<Outbound> {
        let Some(user) = self.users.get(&client) else {
            return Vec::new();
        };
        let Some(room_id) = user.room else {
            return Vec::new();
        };

        let mut outs = Vec::new();
        let started = {
            let Self {
                rooms,
                registry,
                rng,
                ..
            } = self;
            let Some(room) = rooms.get_mut(&room_id) else {
                return Vec::new();
            };
            if room.game_started {
                return Vec::new();
            }
            let Some(player) = room.player_mut(client) else {
                return Vec::new();
            };
            player.is_ready = !player.is_ready;
            outs.push(Outbound {
                to: room.participant_ids(),
                packet: Packet::ReadyUpdate {
                    players: room.players.clone(),
                },
            });

            // Flip to in-progress exactly when two seats are filled and
            // everyone seated is ready.
            if room.seated_count() >= 2 && room.all_ready() {
                match registry.lookup(room.game_type) {
                    Some(module) => {
                        let state = module.init(rng);
                        room.game_state = Some(state.clone());
                        room.game_started = true;
                        info!("room {room_id}: game started ({})", room.game_type);
                        outs.push(Outbound {
                            to: room.participant_ids(),
                            packet: Packet::GameStarted {
                                game_type: room.game_type,
                                state,
                                players: room.players.clone(),
                            },
                        });
                        true
                    }
                    None => {
                        warn!("room {room_id}: no module for {}", room.game_type);
                        false
                    }
                }
            } else {
                false
            }
        };

        if started {
            outs.push(self.rooms_broadcast());
        }
        outs
    }

    // ── Gameplay ────────────────────────────────────────────────────────────

    /// Routes one gameplay action: identity → room in progress → registry →
    /// rule module. A `None` from the module is dropped silently; a panic is
    /// contained to this action and reported only to the actor.
    pub fn game_action(&mut self, client: ClientId, action: &GameAction) -> Vec<Outbound> {
        let Some(user) = self.users.get(&client) else {
            return Vec::new();
        };
        let Some(room_id) = user.room else {
            return Vec::new();
        };

        let mut outs = Vec::new();
        let ended = {
            let Self {
                rooms,
                registry,
                rng,
                ..
            } = self;
            let Some(room) = rooms.get_mut(&room_id) else {
                return Vec::new();
            };
            if !room.game_started {
                return Vec::new();
            }
            let Some(seat) = room.player(client).and_then(|p| p.seat) else {
                return Vec::new();
            };
            let Some(module) = registry.lookup(room.game_type) else {
                warn!("room {room_id}: no module for {}", room.game_type);
                return Vec::new();
            };
            let Some(names) = room.seat_names() else {
                return Vec::new();
            };
            let names: [String; 2] = [names[0].to_string(), names[1].to_string()];
            let Some(state) = room.game_state.as_mut() else {
                error!("room {room_id}: started without game state");
                return Vec::new();
            };
            let ctx = TurnCtx {
                seat,
                username: &names[seat],
                names: [&names[0], &names[1]],
            };

            let result = catch_unwind(AssertUnwindSafe(|| {
                module.process_action(&ctx, state, action, rng)
            }));
            let outcome = match result {
                Err(_) => {
                    // One room's defect must not take down the process or
                    // leak into other rooms.
                    error!(
                        "room {room_id}: rule module for {} panicked processing an action",
                        room.game_type
                    );
                    return vec![Outbound::single(
                        client,
                        Packet::Error {
                            message: "An unexpected error occurred.".to_string(),
                        },
                    )];
                }
                Ok(None) => return Vec::new(),
                Ok(Some(outcome)) => outcome,
            };

            let canonical = state.clone();
            outs.push(Outbound {
                to: room.participant_ids(),
                packet: Packet::GameUpdate {
                    state: canonical,
                    outcome: outcome.clone(),
                },
            });

            if outcome.game_over {
                info!(
                    "room {room_id}: game over, winner {:?}",
                    outcome.winner_name
                );
                room.reset_after_game();
                true
            } else {
                false
            }
        };

        if ended {
            outs.push(self.rooms_broadcast());
        }
        outs
    }

    // ── Rematch ─────────────────────────────────────────────────────────────

    /// Advisory only: relays the offer to the other participants, never
    /// restarts anything by itself.
    pub fn rematch(&mut self, client: ClientId) -> Vec<Outbound> {
        let Some(user) = self.users.get(&client) else {
            return Vec::new();
        };
        let Some(room_id) = user.room else {
            return Vec::new();
        };
        let Some(room) = self.rooms.get(&room_id) else {
            return Vec::new();
        };
        if room.game_started {
            return Vec::new();
        }
        vec![Outbound {
            to: room.participant_ids_except(client),
            packet: Packet::RematchOffer {
                from_name: user.username.clone(),
            },
        }]
    }
}
