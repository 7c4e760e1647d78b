//! Rule engines for the eight supported games.
//!
//! Each module is a stateless validator/reducer over its `GameState` payload;
//! all of them share the universal preconditions (acting seat on turn, target
//! in bounds and legal) and the strict two-seat alternation convention, with
//! the documented exceptions (reversi pass-back, wheel keep-turn, password
//! role phases).

pub mod checkers;
pub mod chess;
pub mod connect4;
pub mod gomoku;
pub mod password;
pub mod reversi;
pub mod tictactoe;
pub mod wheel;
