//! Strictly Chat - reply-driven board games for chat platforms
//!
//! Players start a game with a command that mentions an opponent. The bot
//! answers with the board, and every move is a reply to the latest board.
//! No game ids are ever typed: the message being replied to identifies the
//! game.
//!
//! # Architecture
//!
//! - **Correlator**: turn enforcement and state advancement per reply
//! - **Registry**: sent message id to in-progress session
//! - **Rules**: pluggable [`RulesEngine`] (tic-tac-toe ships with the crate)
//! - **Collaborators**: [`BoardRenderer`], [`IdentityResolver`], [`MessageChannel`]
//! - **Front ends**: HTTP ingress and an interactive console
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use strictly_chat::{
//!     CorrelationRegistry, DirectoryResolver, MemoryChannel, SessionCorrelator,
//!     TextRenderer, TicTacToeEngine,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let correlator = SessionCorrelator::new(
//!     TicTacToeEngine,
//!     CorrelationRegistry::new(),
//!     Arc::new(TextRenderer::new()),
//!     Arc::new(DirectoryResolver::default()),
//!     Arc::new(MemoryChannel::new()),
//! );
//! correlator.start_session("c1", "alice", Some("bob")).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod channel;
mod config;
mod console;
mod correlator;
mod db;
mod events;
mod games;
mod identity;
mod registry;
mod render;
mod rules;
mod server;
mod session;

// Crate-level exports - Rules
pub use rules::{BoardSnapshot, IllegalMove, Piece, RulesEngine, Side};

// Crate-level exports - Games
pub use games::TicTacToeEngine;

// Crate-level exports - Sessions
pub use registry::CorrelationRegistry;
pub use session::{GameSession, MessageId, ParticipantId, Seating, side_owner};

// Crate-level exports - Correlation
pub use correlator::{InvalidInvocation, ReplyOutcome, SessionCorrelator, SessionError, StartOutcome};
pub use events::{EventOutcome, EventRouter, InboundEvent};

// Crate-level exports - Collaborators
pub use channel::{
    Attachment, ChannelError, Delivered, Mention, MemoryChannel, MessageChannel, OutboundMessage,
    SentMessage, WebhookChannel,
};
pub use identity::{DirectoryResolver, IdentityResolver, UNKNOWN_PARTICIPANT};
pub use render::{BoardRenderer, RenderError, TextRenderer};

// Crate-level exports - Persistence
pub use db::{DbError, MIGRATIONS, NewParticipant, Participant, ParticipantRepository};

// Crate-level exports - Configuration
pub use config::{BotConfig, ConfigError, WEBHOOK_TOKEN_ENV, WEBHOOK_URL_ENV};

// Crate-level exports - Front ends
pub use console::{parse_line, run_console};
pub use server::{ServerError, build_router, serve, spawn_idle_sweeper, supervise};
