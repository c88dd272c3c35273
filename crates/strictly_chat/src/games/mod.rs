//! Rules engines shipped with the bot.

mod tictactoe;

pub use tictactoe::TicTacToeEngine;
