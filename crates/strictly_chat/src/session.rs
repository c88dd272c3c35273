//! Game session state carried between replies.

use crate::rules::Side;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use tracing::{debug, instrument};

/// Chat platform identifier of a participant.
pub type ParticipantId = String;

/// Chat platform identifier of a message.
pub type MessageId = String;

/// Maps a side to the participant playing it.
///
/// The initiator always plays [`Side::First`].
pub fn side_owner<'a>(side: Side, initiator: &'a str, opponent: &'a str) -> &'a str {
    match side {
        Side::First => initiator,
        Side::Second => opponent,
    }
}

/// Who plays in a session and whose turn its latest board announced.
///
/// This is everything needed to answer a reply that cannot move, so the
/// registry keeps it readable while a move is being handled.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Seating {
    initiator: ParticipantId,
    opponent: ParticipantId,
    to_move: Side,
}

impl Seating {
    /// Creates a seating with `to_move` on turn.
    pub fn new(initiator: ParticipantId, opponent: ParticipantId, to_move: Side) -> Self {
        debug_assert_ne!(initiator, opponent, "a participant cannot play themselves");
        Self {
            initiator,
            opponent,
            to_move,
        }
    }

    /// Returns the participant playing `side`.
    pub fn side_owner(&self, side: Side) -> &str {
        side_owner(side, &self.initiator, &self.opponent)
    }

    /// Returns the side `participant` plays, if they play in this session.
    pub fn side_of(&self, participant: &str) -> Option<Side> {
        if participant == self.initiator {
            Some(Side::First)
        } else if participant == self.opponent {
            Some(Side::Second)
        } else {
            None
        }
    }
}

/// One in-progress game between two participants.
///
/// `token` is the id of the last board update sent for this session and is
/// the only key under which the session can be found again.
#[derive(Debug, Getters)]
pub struct GameSession<S> {
    #[getter(skip)]
    state: S,
    seating: Seating,
    token: MessageId,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
    moves_played: u32,
}

impl<S> GameSession<S> {
    /// Creates a session correlated to the message `token`.
    #[instrument(skip(state))]
    pub fn new(state: S, seating: Seating, token: MessageId, now: DateTime<Utc>) -> Self {
        Self {
            state,
            seating,
            token,
            created_at: now,
            last_active: now,
            moves_played: 0,
        }
    }

    /// Returns the game state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Returns the game state for the rules engine to advance.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Returns the participant who started the game.
    pub fn initiator(&self) -> &ParticipantId {
        self.seating.initiator()
    }

    /// Returns the participant who was challenged.
    pub fn opponent(&self) -> &ParticipantId {
        self.seating.opponent()
    }

    /// Returns the participant playing `side`.
    pub fn side_owner(&self, side: Side) -> &str {
        self.seating.side_owner(side)
    }

    /// Returns the side `participant` plays, if they play in this session.
    pub fn side_of(&self, participant: &str) -> Option<Side> {
        self.seating.side_of(participant)
    }

    /// Counts an accepted move and hands the turn to `next`.
    pub fn record_move(&mut self, next: Side, now: DateTime<Utc>) {
        self.moves_played += 1;
        self.seating.to_move = next;
        self.last_active = now;
    }

    /// Moves the correlation to a newly sent message.
    #[instrument(skip(self), fields(previous = %self.token))]
    pub fn rearm(&mut self, token: MessageId, now: DateTime<Utc>) {
        debug!(%token, "Re-arming session");
        self.token = token;
        self.last_active = now;
    }
}
