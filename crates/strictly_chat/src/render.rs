//! Board rendering seam and the built-in text renderer.

use crate::channel::Attachment;
use crate::rules::{BoardSnapshot, Piece, Side};
use derive_more::{Display, Error};
use tracing::{debug, instrument};

/// Rendering failure.
#[derive(Debug, Clone, Display, Error)]
#[display("Render error: {} at {}:{}", message, file, line)]
pub struct RenderError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl RenderError {
    /// Creates a new render error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Turns a board snapshot into an attachment.
#[async_trait::async_trait]
pub trait BoardRenderer: Send + Sync {
    /// Renders `snapshot`.
    async fn render(&self, snapshot: &BoardSnapshot) -> Result<Attachment, RenderError>;
}

/// Renders boards as a bordered character grid.
///
/// Rows are labelled from the board height down to `1` and columns from `A`,
/// so coordinates read the same way as on a chess board:
///
/// ```text
///   +---+---+---+
/// 3 | X |   |   |
///   +---+---+---+
/// 2 |   | O |   |
///   +---+---+---+
/// 1 |   |   |   |
///   +---+---+---+
///     A   B   C
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer {
    case_by_side: bool,
}

impl TextRenderer {
    /// Creates a renderer that prints piece kinds as given.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a renderer that upper-cases the first side's pieces and
    /// lower-cases the second side's, as in FEN.
    pub fn case_by_side() -> Self {
        Self { case_by_side: true }
    }

    fn glyph(&self, cell: Option<Piece>) -> char {
        match cell {
            None => ' ',
            Some(piece) if !self.case_by_side => piece.kind,
            Some(Piece { kind, side: Side::First }) => kind.to_ascii_uppercase(),
            Some(Piece { kind, side: Side::Second }) => kind.to_ascii_lowercase(),
        }
    }

    /// Draws the grid as text.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] for empty or ragged boards, or boards wider
    /// than the 26 column letters.
    #[instrument(skip(self, snapshot), fields(height = snapshot.height(), width = snapshot.width()))]
    pub fn draw(&self, snapshot: &BoardSnapshot) -> Result<String, RenderError> {
        let height = snapshot.height();
        let width = snapshot.width();

        if height == 0 || width == 0 {
            return Err(RenderError::new("Board is empty"));
        }
        if width > 26 {
            return Err(RenderError::new(format!("Board has {} columns, at most 26 can be labelled", width)));
        }
        if snapshot.rows().iter().any(|row| row.len() != width) {
            return Err(RenderError::new("Board rows differ in length"));
        }

        let label_width = height.to_string().len();
        let border = format!("{:label_width$} +{}\n", "", "---+".repeat(width));

        let mut out = border.clone();
        for (i, row) in snapshot.rows().iter().enumerate() {
            out.push_str(&format!("{:>label_width$} |", height - i));
            for cell in row {
                out.push_str(&format!(" {} |", self.glyph(*cell)));
            }
            out.push('\n');
            out.push_str(&border);
        }

        out.push_str(&" ".repeat(label_width));
        for col in 0..width {
            out.push_str(&format!("   {}", char::from(b'A' + col as u8)));
        }
        out.push('\n');

        debug!(bytes = out.len(), "Board drawn");
        Ok(out)
    }
}

#[async_trait::async_trait]
impl BoardRenderer for TextRenderer {
    async fn render(&self, snapshot: &BoardSnapshot) -> Result<Attachment, RenderError> {
        let text = self.draw(snapshot)?;
        Ok(Attachment::new("board.txt", "text/plain; charset=utf-8", text.into_bytes()))
    }
}
