//! Inbound chat events and their dispatch to the correlator.

use crate::correlator::{ReplyOutcome, SessionCorrelator, SessionError, StartOutcome};
use crate::rules::RulesEngine;
use crate::session::{MessageId, ParticipantId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// An event delivered by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A command invocation such as `!tictactoe @bob`.
    Command {
        /// Id of the command message.
        message_id: MessageId,
        /// Who invoked the command.
        sender: ParticipantId,
        /// Command name, with or without the prefix.
        command: String,
        /// Mentioned participants in message order.
        #[serde(default)]
        mentions: Vec<ParticipantId>,
        /// Remaining words of the command.
        #[serde(default)]
        args: Vec<String>,
    },
    /// A reply to an earlier message.
    Reply {
        /// Id of the reply message.
        message_id: MessageId,
        /// Id of the message being replied to.
        reply_to: MessageId,
        /// Who replied.
        sender: ParticipantId,
        /// Reply text.
        text: String,
    },
}

/// What an event led to, as reported by the HTTP ingress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EventOutcome {
    /// A session started.
    Started {
        /// Correlation key of the first board.
        token: MessageId,
    },
    /// The command was invalid and a prompt was sent.
    Rejected {
        /// The prompt text.
        reason: String,
    },
    /// The command is not handled by this bot.
    UnknownCommand {
        /// The command as received.
        command: String,
    },
    /// The reply did not match an active session.
    Ignored,
    /// The sender does not play in the session.
    NotParticipant,
    /// The sender moved out of turn.
    TurnViolation,
    /// The move was refused.
    IllegalMove {
        /// Reason sent to the player.
        description: String,
    },
    /// The game continues under a new key.
    Continued {
        /// New correlation key.
        token: MessageId,
    },
    /// The game was won.
    Won {
        /// Winning participant.
        winner: ParticipantId,
    },
    /// The game was drawn.
    Drawn,
}

impl From<StartOutcome> for EventOutcome {
    fn from(outcome: StartOutcome) -> Self {
        match outcome {
            StartOutcome::Started { token } => Self::Started { token },
            StartOutcome::Rejected(reason) => Self::Rejected {
                reason: reason.to_string(),
            },
        }
    }
}

impl From<ReplyOutcome> for EventOutcome {
    fn from(outcome: ReplyOutcome) -> Self {
        match outcome {
            ReplyOutcome::Ignored => Self::Ignored,
            ReplyOutcome::NotParticipant => Self::NotParticipant,
            ReplyOutcome::TurnViolation => Self::TurnViolation,
            ReplyOutcome::IllegalMove { description } => Self::IllegalMove { description },
            ReplyOutcome::Continued { token } => Self::Continued { token },
            ReplyOutcome::Won { winner } => Self::Won { winner },
            ReplyOutcome::Drawn => Self::Drawn,
        }
    }
}

/// Routes inbound events to the correlator.
pub struct EventRouter<E: RulesEngine> {
    correlator: SessionCorrelator<E>,
    command: String,
    prefix: String,
}

impl<E: RulesEngine> EventRouter<E> {
    /// Creates a router answering `command` (compared case-insensitively,
    /// `prefix` optional).
    #[instrument(skip(correlator))]
    pub fn new(correlator: SessionCorrelator<E>, command: String, prefix: String) -> Self {
        info!("Creating event router");
        Self {
            correlator,
            command,
            prefix,
        }
    }

    /// Returns the correlator.
    pub fn correlator(&self) -> &SessionCorrelator<E> {
        &self.correlator
    }

    /// Returns the prefix commands are typed with.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn is_own_command(&self, command: &str) -> bool {
        let name = command.strip_prefix(self.prefix.as_str()).unwrap_or(command);
        name.eq_ignore_ascii_case(&self.command)
    }

    /// Handles one event.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when a collaborator fails.
    #[instrument(skip(self, event))]
    pub async fn dispatch(&self, event: InboundEvent) -> Result<EventOutcome, SessionError> {
        match event {
            InboundEvent::Command {
                message_id,
                sender,
                command,
                mentions,
                ..
            } => {
                if !self.is_own_command(&command) {
                    debug!(%command, "Command not handled here");
                    return Ok(EventOutcome::UnknownCommand { command });
                }
                let outcome = self
                    .correlator
                    .start_session(&message_id, &sender, mentions.first().map(String::as_str))
                    .await?;
                Ok(outcome.into())
            }
            InboundEvent::Reply {
                message_id,
                reply_to,
                sender,
                text,
            } => {
                let outcome = self
                    .correlator
                    .handle_reply(&message_id, &reply_to, &sender, &text)
                    .await?;
                Ok(outcome.into())
            }
        }
    }
}
