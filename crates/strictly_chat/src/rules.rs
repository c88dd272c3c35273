//! Rules engine seam.
//!
//! The correlator never looks inside a game state. Everything it needs to
//! know (whose turn it is, whether a move is legal, whether the game has
//! ended) comes through [`RulesEngine`], so any two-player turn-based game can
//! be plugged in.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Abstract turn slot, decoupled from a game's own colour naming.
///
/// The initiator of a session always owns [`Side::First`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    /// Moves first.
    First,
    /// Moves second.
    Second,
}

impl Side {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// A piece on the board: what it is and who owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct Piece {
    /// Single-character kind, e.g. `'N'` for a knight or `'X'` for a mark.
    pub kind: char,
    /// Owning side.
    pub side: Side,
}

/// Grid view of a position, top row first, used for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardSnapshot {
    rows: Vec<Vec<Option<Piece>>>,
}

impl BoardSnapshot {
    /// Creates a snapshot from rows, top row first.
    pub fn new(rows: Vec<Vec<Option<Piece>>>) -> Self {
        Self { rows }
    }

    /// Returns the rows, top row first.
    pub fn rows(&self) -> &[Vec<Option<Piece>>] {
        &self.rows
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// A move the rules engine refused, with a description fit for players.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{}", description)]
pub struct IllegalMove {
    /// Human-readable reason.
    pub description: String,
}

impl IllegalMove {
    /// Creates a rejection with the given description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Capability set of a two-player rules implementation.
///
/// Implementations own the meaning of `State`; the correlator only stores it
/// and hands it back.
pub trait RulesEngine: Send + Sync + 'static {
    /// Game state, exclusively owned by one session.
    type State: Send + 'static;

    /// Short game name for logs.
    fn name(&self) -> &'static str;

    /// Creates the initial position with [`Side::First`] to move.
    fn new_game(&self) -> Self::State;

    /// Reports the side to move.
    fn side_to_move(&self, state: &Self::State) -> Side;

    /// The game's own name for a side ("white", "X", ...).
    fn side_name(&self, side: Side) -> &'static str;

    /// Validates and applies `notation` for the side to move.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalMove`] when the notation cannot be parsed or the move
    /// is not legal. `state` must be unchanged in that case.
    fn apply_move(&self, state: &mut Self::State, notation: &str) -> Result<(), IllegalMove>;

    /// Grid of pieces for rendering.
    fn board_snapshot(&self, state: &Self::State) -> BoardSnapshot;

    /// Whether the last move won the game.
    fn is_win(&self, state: &Self::State) -> bool;

    /// Whether the game is drawn, whatever the kind of draw.
    fn is_draw(&self, state: &Self::State) -> bool;
}
