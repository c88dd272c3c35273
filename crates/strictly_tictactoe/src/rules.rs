//! Game logic and rules for tic-tac-toe.

use crate::{Board, GameStatus, Player, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Error that can occur when applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// The text does not name a square.
    #[display("Invalid move: '{}' is not a square (use 1-9, a1-c3 or a label like center)", _0)]
    UnknownPosition(#[error(not(source))] String),

    /// The square at the position is already occupied.
    #[display("Invalid move: {} is already occupied", _0)]
    SquareOccupied(#[error(not(source))] Position),

    /// The game is already over.
    #[display("Invalid move: the game is already over")]
    GameOver,
}

/// Tic-tac-toe game engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    to_move: Player,
    status: GameStatus,
    history: Vec<Position>,
}

impl Game {
    /// Creates a new game with X to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Player::X,
            status: GameStatus::InProgress,
            history: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player to move.
    ///
    /// Once the game has ended this is the player who made the last move.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the positions played so far.
    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Parses `notation` and plays it for the player to move.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::UnknownPosition`] if the text names no square.
    /// See [`Game::play`] for the remaining cases.
    #[instrument(skip(self), fields(to_move = %self.to_move))]
    pub fn play_notation(&mut self, notation: &str) -> Result<GameStatus, MoveError> {
        let pos = Position::parse(notation)
            .ok_or_else(|| MoveError::UnknownPosition(notation.to_string()))?;
        self.play(pos)
    }

    /// Places the current player's mark at `pos`.
    ///
    /// The board is left untouched when an error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::GameOver`] once the game has ended and
    /// [`MoveError::SquareOccupied`] if the square is taken.
    #[instrument(skip(self), fields(to_move = %self.to_move))]
    pub fn play(&mut self, pos: Position) -> Result<GameStatus, MoveError> {
        if self.status != GameStatus::InProgress {
            return Err(MoveError::GameOver);
        }
        if !self.board.is_empty(pos) {
            return Err(MoveError::SquareOccupied(pos));
        }

        let player = self.to_move;
        self.board.set(pos, Square::Occupied(player));
        self.history.push(pos);

        self.status = if let Some(winner) = self.board.winner() {
            GameStatus::Won(winner)
        } else if self.board.is_full() {
            GameStatus::Draw
        } else {
            self.to_move = player.opponent();
            GameStatus::InProgress
        };

        debug!(%pos, %player, status = ?self.status, "Mark placed");
        Ok(self.status)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
