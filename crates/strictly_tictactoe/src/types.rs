//! Core domain types for tic-tac-toe.

use crate::Position;
use serde::{Deserialize, Serialize};

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order, top-left first.
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Sets the square at the given position.
    pub(crate) fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares in row-major order.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Returns the board as three rows, top row first.
    pub fn rows(&self) -> [[Square; 3]; 3] {
        [
            [self.squares[0], self.squares[1], self.squares[2]],
            [self.squares[3], self.squares[4], self.squares[5]],
            [self.squares[6], self.squares[7], self.squares[8]],
        ]
    }

    /// Checks if the board is full.
    pub fn is_full(&self) -> bool {
        self.squares.iter().all(|s| *s != Square::Empty)
    }

    /// Checks for a winner on the board.
    pub fn winner(&self) -> Option<Player> {
        const LINES: [[Position; 3]; 8] = [
            // Rows
            [Position::TopLeft, Position::TopCenter, Position::TopRight],
            [Position::MiddleLeft, Position::Center, Position::MiddleRight],
            [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
            // Columns
            [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
            [Position::TopCenter, Position::Center, Position::BottomCenter],
            [Position::TopRight, Position::MiddleRight, Position::BottomRight],
            // Diagonals
            [Position::TopLeft, Position::Center, Position::BottomRight],
            [Position::TopRight, Position::Center, Position::BottomLeft],
        ];

        LINES.iter().find_map(|[a, b, c]| match self.get(*a) {
            Square::Occupied(p) if self.get(*b) == Square::Occupied(p) && self.get(*c) == Square::Occupied(p) => {
                Some(p)
            }
            _ => None,
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Draw,
}
