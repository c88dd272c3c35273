//! Board positions and the move notations players may type.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

/// A position on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum Position {
    /// Top-left (square 1, `a3`)
    TopLeft,
    /// Top-center (square 2, `b3`)
    TopCenter,
    /// Top-right (square 3, `c3`)
    TopRight,
    /// Middle-left (square 4, `a2`)
    MiddleLeft,
    /// Center (square 5, `b2`)
    Center,
    /// Middle-right (square 6, `c2`)
    MiddleRight,
    /// Bottom-left (square 7, `a1`)
    BottomLeft,
    /// Bottom-center (square 8, `b1`)
    BottomCenter,
    /// Bottom-right (square 9, `c1`)
    BottomRight,
}

impl Position {
    /// Get label for this position (for display).
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "top-left",
            Position::TopCenter => "top-center",
            Position::TopRight => "top-right",
            Position::MiddleLeft => "middle-left",
            Position::Center => "center",
            Position::MiddleRight => "middle-right",
            Position::BottomLeft => "bottom-left",
            Position::BottomCenter => "bottom-center",
            Position::BottomRight => "bottom-right",
        }
    }

    /// Converts position to board index (0-8, row-major from the top-left).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Creates position from board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    /// Parses the notation a player typed.
    ///
    /// Accepted forms, case-insensitive:
    /// - square numbers `1`-`9`, left-to-right and top-to-bottom;
    /// - coordinates `a1`-`c3`, columns left-to-right and rows counted from
    ///   the bottom, matching the rendered board margins;
    /// - labels such as `center`, `top-left`, `bottom right` or `topright`.
    #[instrument]
    pub fn parse(input: &str) -> Option<Self> {
        let normalized: String = input
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();

        if let Ok(num) = normalized.parse::<usize>() {
            return num.checked_sub(1).and_then(Self::from_index);
        }

        if let Some(pos) = Self::from_coordinate(&normalized) {
            return Some(pos);
        }

        match normalized.as_str() {
            "centre" | "middle" => Some(Position::Center),
            "top" => Some(Position::TopCenter),
            "bottom" => Some(Position::BottomCenter),
            "left" => Some(Position::MiddleLeft),
            "right" => Some(Position::MiddleRight),
            other => Self::iter().find(|pos| pos.label().replace('-', "") == other),
        }
    }

    fn from_coordinate(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let (file, rank) = (chars.next()?, chars.next()?);
        if chars.next().is_some() {
            return None;
        }
        let col = match file {
            'a' => 0,
            'b' => 1,
            'c' => 2,
            _ => return None,
        };
        let row = match rank {
            '3' => 0,
            '2' => 1,
            '1' => 2,
            _ => return None,
        };
        Self::from_index(row * 3 + col)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
