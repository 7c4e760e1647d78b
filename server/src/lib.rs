//! # Gaming Rooms Server Library
//!
//! Authoritative server for a real-time multiplayer room system: clients
//! register an identity, browse and join named rooms bound to one of eight
//! turn-based games, ready up, and exchange gameplay actions that the server
//! validates and applies before broadcasting the canonical state to every
//! participant.
//!
//! ## Architecture
//!
//! All room and user state is mutated by a single-threaded event loop that
//! processes inbound packets in arrival order, so no locking discipline is
//! needed around game state and no participant ever observes a half-applied
//! action. Everything lives in process memory; a restart loses all rooms and
//! games by design.
//!
//! ## Module Organization
//!
//! - [`client_manager`]: connection table with id assignment, capacity,
//!   per-connection rate limiting, and timeout detection.
//! - [`network`]: UDP transport adapter with receiver/sender tasks around
//!   the serialized main loop, registration gating, and delivery fan-out.
//! - [`session`]: the scheduler owning the user and room tables, the room
//!   lifecycle (waiting, in-progress, ended/aborted), action routing, chat,
//!   ready-up, rematch, and disconnect handling.
//! - [`room`]: one match's aggregate of roster, spectators, chat ring,
//!   game state, and lifecycle flags.
//! - [`registry`]: the uniform game-module contract and the kind-to-module
//!   table built at startup.
//! - [`games`]: the eight rule engines behind the contract, from
//!   tic-tac-toe up to full-legality chess.

pub mod client_manager;
pub mod games;
pub mod network;
pub mod registry;
pub mod room;
pub mod session;
pub mod utils;
