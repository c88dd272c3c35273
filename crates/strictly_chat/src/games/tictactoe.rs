//! Tic-tac-toe behind the [`RulesEngine`] seam.

use crate::rules::{BoardSnapshot, IllegalMove, Piece, RulesEngine, Side};
use strictly_tictactoe::{Game, GameStatus, Player, Square};
use tracing::{debug, instrument};

/// Tic-tac-toe rules: X is [`Side::First`], O is [`Side::Second`].
///
/// Moves are square numbers `1`-`9`, coordinates `a1`-`c3` or labels such as
/// `center`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToeEngine;

fn side_of(player: Player) -> Side {
    match player {
        Player::X => Side::First,
        Player::O => Side::Second,
    }
}

impl RulesEngine for TicTacToeEngine {
    type State = Game;

    fn name(&self) -> &'static str {
        "tictactoe"
    }

    fn new_game(&self) -> Game {
        Game::new()
    }

    fn side_to_move(&self, state: &Game) -> Side {
        side_of(state.to_move())
    }

    fn side_name(&self, side: Side) -> &'static str {
        match side {
            Side::First => "X",
            Side::Second => "O",
        }
    }

    #[instrument(skip(self, state))]
    fn apply_move(&self, state: &mut Game, notation: &str) -> Result<(), IllegalMove> {
        let status = state
            .play_notation(notation)
            .map_err(|e| IllegalMove::new(e.to_string()))?;
        debug!(?status, "Move applied");
        Ok(())
    }

    fn board_snapshot(&self, state: &Game) -> BoardSnapshot {
        let rows = state
            .board()
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|square| match square {
                        Square::Empty => None,
                        Square::Occupied(Player::X) => Some(Piece::new('X', Side::First)),
                        Square::Occupied(Player::O) => Some(Piece::new('O', Side::Second)),
                    })
                    .collect()
            })
            .collect();
        BoardSnapshot::new(rows)
    }

    fn is_win(&self, state: &Game) -> bool {
        matches!(state.status(), GameStatus::Won(_))
    }

    fn is_draw(&self, state: &Game) -> bool {
        state.status() == GameStatus::Draw
    }
}
