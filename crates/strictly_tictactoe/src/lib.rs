//! Pure tic-tac-toe game logic.
//!
//! The game is a plain value: [`Game::play`] validates a [`Position`] against
//! the board and either applies it or returns a [`MoveError`] without touching
//! the board. Positions can be parsed from the free-form text players type
//! into a chat reply (see [`Position::parse`]).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod position;
mod rules;
mod types;

pub use position::Position;
pub use rules::{Game, MoveError};
pub use types::{Board, GameStatus, Player, Square};
