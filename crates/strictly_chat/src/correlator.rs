//! Turn enforcement and state advancement across reply-linked messages.
//!
//! A game is never addressed by an id of its own. Each board update the bot
//! sends becomes the correlation key for the next move, and a reply to any
//! other message simply finds nothing.

use crate::channel::{ChannelError, Mention, MessageChannel, OutboundMessage, SentMessage};
use crate::identity::IdentityResolver;
use crate::registry::CorrelationRegistry;
use crate::render::{BoardRenderer, RenderError};
use crate::rules::{BoardSnapshot, RulesEngine, Side};
use crate::session::{GameSession, MessageId, ParticipantId, Seating};
use chrono::Utc;
use derive_more::{Display, Error, From};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Collaborator failure while handling an event.
#[derive(Debug, Display, Error, From)]
pub enum SessionError {
    /// The board could not be rendered.
    #[display("Failed to render board: {}", _0)]
    Render(RenderError),
    /// The chat platform did not accept a message.
    #[display("Failed to deliver message: {}", _0)]
    Delivery(ChannelError),
}

/// Why a command could not start a game. Displays as the prompt sent back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InvalidInvocation {
    /// Nobody was mentioned.
    #[display("Please tag someone to be your opponent")]
    NoOpponent,
    /// The initiator mentioned themselves.
    #[display("You can't play against yourself, tag someone else")]
    SelfPlay,
}

/// Result of [`SessionCorrelator::start_session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The first board was sent and the session correlated to it.
    Started {
        /// Correlation key of the new session.
        token: MessageId,
    },
    /// The prompt was sent instead; no session exists.
    Rejected(InvalidInvocation),
}

/// Result of [`SessionCorrelator::handle_reply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The replied-to message belongs to no active session.
    Ignored,
    /// The sender does not play in this session.
    NotParticipant,
    /// The sender replied out of turn; nothing changed.
    TurnViolation,
    /// The rules engine refused the move; nothing changed.
    IllegalMove {
        /// Description sent back to the player.
        description: String,
    },
    /// The move was applied and the next board sent.
    Continued {
        /// New correlation key.
        token: MessageId,
    },
    /// The move won the game; the session is gone.
    Won {
        /// The participant who made the winning move.
        winner: ParticipantId,
    },
    /// The move drew the game; the session is gone.
    Drawn,
}

/// Owns the reply protocol for one rules engine.
pub struct SessionCorrelator<E: RulesEngine> {
    engine: E,
    registry: CorrelationRegistry<E::State>,
    renderer: Arc<dyn BoardRenderer>,
    identities: Arc<dyn IdentityResolver>,
    channel: Arc<dyn MessageChannel>,
}

impl<E: RulesEngine> SessionCorrelator<E> {
    /// Creates a correlator over an injected registry and collaborators.
    #[instrument(skip_all, fields(engine = engine.name()))]
    pub fn new(
        engine: E,
        registry: CorrelationRegistry<E::State>,
        renderer: Arc<dyn BoardRenderer>,
        identities: Arc<dyn IdentityResolver>,
        channel: Arc<dyn MessageChannel>,
    ) -> Self {
        info!("Creating session correlator");
        Self {
            engine,
            registry,
            renderer,
            identities,
            channel,
        }
    }

    /// Returns the rules engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Returns the correlation registry.
    pub fn registry(&self) -> &CorrelationRegistry<E::State> {
        &self.registry
    }

    /// Starts a game between `initiator` and `opponent`.
    ///
    /// `origin` is the command message; every message sent in response is
    /// threaded under it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if rendering or delivery fails, in which case
    /// no session is registered.
    #[instrument(skip(self), fields(engine = self.engine.name()))]
    pub async fn start_session(
        &self,
        origin: &str,
        initiator: &str,
        opponent: Option<&str>,
    ) -> Result<StartOutcome, SessionError> {
        let opponent = match opponent {
            None => return self.reject(origin, InvalidInvocation::NoOpponent).await,
            Some(o) if o == initiator => return self.reject(origin, InvalidInvocation::SelfPlay).await,
            Some(o) => o,
        };

        let state = self.engine.new_game();
        let side = self.engine.side_to_move(&state);
        let snapshot = self.engine.board_snapshot(&state);
        let seating = Seating::new(initiator.to_string(), opponent.to_string(), side);
        let sent = self
            .announce_turn(origin, side, snapshot, seating.side_owner(side))
            .await?;

        let session = GameSession::new(state, seating, sent.id().clone(), Utc::now());
        self.registry.insert(session);

        info!(token = %sent.id(), "Session started");
        Ok(StartOutcome::Started {
            token: sent.id().clone(),
        })
    }

    async fn reject(&self, origin: &str, reason: InvalidInvocation) -> Result<StartOutcome, SessionError> {
        warn!(?reason, "Invalid invocation");
        self.send(OutboundMessage::plain(reason.to_string()).in_reply_to(origin))
            .await?;
        Ok(StartOutcome::Rejected(reason))
    }

    /// Handles a reply to the message `token` carrying a move.
    ///
    /// `origin` is the reply itself; responses are threaded under it. Only the
    /// first whitespace-separated word of `raw_move_text` is used, lower-cased.
    ///
    /// Replies that cannot move are answered from the session's seating, which
    /// stays readable while another reply to the same board is being handled.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if a response cannot be rendered or delivered.
    /// When the next board of a continuing game cannot be sent, the advanced
    /// session stays correlated to `token`.
    #[instrument(skip(self, raw_move_text), fields(engine = self.engine.name()))]
    pub async fn handle_reply(
        &self,
        origin: &str,
        token: &str,
        sender: &str,
        raw_move_text: &str,
    ) -> Result<ReplyOutcome, SessionError> {
        let Some(seating) = self.registry.seating(token) else {
            debug!("Reply is not part of an active session");
            return Ok(ReplyOutcome::Ignored);
        };

        let Some(sender_side) = seating.side_of(sender) else {
            debug!("Sender is not playing in this session");
            return Ok(ReplyOutcome::NotParticipant);
        };

        if sender_side != *seating.to_move() {
            return self.refuse_turn(origin, *seating.to_move(), sender_side).await;
        }

        let Some(mut session) = self.registry.claim(token) else {
            debug!("Another reply to this board is being handled");
            return Ok(ReplyOutcome::Ignored);
        };

        // The turn may have passed between reading the seating and claiming.
        let to_move = self.engine.side_to_move(session.state());
        if sender_side != to_move {
            self.registry.insert(session);
            return self.refuse_turn(origin, to_move, sender_side).await;
        }

        let notation = normalize_move(raw_move_text);
        if let Err(illegal) = self.engine.apply_move(session.state_mut(), &notation) {
            warn!(%notation, reason = %illegal, "Move rejected");
            self.registry.insert(session);
            self.send(OutboundMessage::plain(illegal.to_string()).in_reply_to(origin))
                .await?;
            return Ok(ReplyOutcome::IllegalMove {
                description: illegal.description,
            });
        }
        let next_side = self.engine.side_to_move(session.state());
        session.record_move(next_side, Utc::now());

        if self.engine.is_win(session.state()) {
            info!(winner = %sender, moves = session.moves_played(), "Game won");
            self.registry.remove(token);
            let name = self.identities.display_name(sender).await;
            self.send(OutboundMessage::plain(format!("Game over! {} wins the game", name)).in_reply_to(origin))
                .await?;
            return Ok(ReplyOutcome::Won {
                winner: sender.to_string(),
            });
        }

        if self.engine.is_draw(session.state()) {
            info!(moves = session.moves_played(), "Game drawn");
            self.registry.remove(token);
            self.send(OutboundMessage::plain("The game ended in a draw!").in_reply_to(origin))
                .await?;
            return Ok(ReplyOutcome::Drawn);
        }

        let snapshot = self.engine.board_snapshot(session.state());
        let owner = session.side_owner(next_side).to_string();
        let announced = self.announce_turn(origin, next_side, snapshot, &owner).await;
        match announced {
            Ok(sent) => {
                let next = sent.id().clone();
                session.rearm(next.clone(), Utc::now());
                self.registry.replace(token, session);
                info!(%next, "Session advanced");
                Ok(ReplyOutcome::Continued { token: next })
            }
            Err(e) => {
                error!(error = %e, "Next board not delivered, keeping previous correlation");
                self.registry.insert(session);
                Err(e)
            }
        }
    }

    async fn refuse_turn(&self, origin: &str, to_move: Side, sender_side: Side) -> Result<ReplyOutcome, SessionError> {
        warn!(%sender_side, %to_move, "Move out of turn");
        let text = format!(
            "It is now {}'s turn, you are playing as {}!",
            self.engine.side_name(to_move),
            self.engine.side_name(sender_side),
        );
        self.send(OutboundMessage::plain(text).in_reply_to(origin)).await?;
        Ok(ReplyOutcome::TurnViolation)
    }

    async fn announce_turn(
        &self,
        origin: &str,
        side: Side,
        snapshot: BoardSnapshot,
        owner: &str,
    ) -> Result<SentMessage, SessionError> {
        let name = self.identities.display_name(owner).await;
        let board = self.renderer.render(&snapshot).await?;

        let message = OutboundMessage::plain(format!(
            "It's {}'s turn (@{})",
            self.engine.side_name(side),
            name
        ))
        .with_mention(Mention::new(owner.to_string(), format!("@{}", name)))
        .with_attachment(board)
        .in_reply_to(origin);

        self.send(message).await
    }

    async fn send(&self, message: OutboundMessage) -> Result<SentMessage, SessionError> {
        Ok(self.channel.send(message).await?)
    }
}

fn normalize_move(raw: &str) -> String {
    raw.split_whitespace().next().unwrap_or_default().to_lowercase()
}
