//! Strictly Chat - Unified CLI
//!
//! Runs the bot behind HTTP or in the terminal, and manages the participant
//! directory.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, ParticipantCommand};
use std::path::Path;
use std::sync::Arc;
use strictly_chat::{
    BoardRenderer, BotConfig, CorrelationRegistry, DirectoryResolver, EventRouter, IdentityResolver,
    MemoryChannel, MessageChannel, ParticipantRepository, SessionCorrelator, TextRenderer,
    TicTacToeEngine, WebhookChannel,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_chat=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, host, config } => run_server(host, port, &config).await,
        Command::Console { config } => run_console(&config).await,
        Command::Participant { action } => run_participant(action),
    }
}

/// Run the HTTP ingress
#[instrument(skip_all, fields(config_path = %config_path.display()))]
async fn run_server(host: String, port: u16, config_path: &Path) -> Result<()> {
    let config = BotConfig::load(config_path)?;
    info!("Starting Strictly Chat server");

    let channel: Arc<dyn MessageChannel> = match config.webhook_url() {
        Some(url) => Arc::new(WebhookChannel::new(url.clone(), config.webhook_token().clone())),
        None => {
            warn!("No webhook configured, outgoing messages stay in memory");
            Arc::new(MemoryChannel::new())
        }
    };

    let bot = Arc::new(build_bot(&config, channel)?);
    strictly_chat::serve(bot, host, port, config.session_ttl()).await
}

/// Run the interactive console
#[instrument(skip_all, fields(config_path = %config_path.display()))]
async fn run_console(config_path: &Path) -> Result<()> {
    let config = BotConfig::load(config_path)?;
    let bot = Arc::new(build_bot(&config, Arc::new(MemoryChannel::echoing()))?);
    strictly_chat::run_console(bot).await
}

/// Manage the participant directory
#[instrument]
fn run_participant(action: ParticipantCommand) -> Result<()> {
    match action {
        ParticipantCommand::Add { id, name, db_path } => {
            let repo = ParticipantRepository::new(db_path);
            repo.migrate()?;
            let participant = repo.upsert(id, name)?;
            println!("{} -> {}", participant.id(), participant.display_name());
        }
        ParticipantCommand::Show { id, db_path } => {
            let repo = ParticipantRepository::new(db_path);
            repo.migrate()?;
            match repo.get(&id)? {
                Some(participant) => println!("{} -> {}", participant.id(), participant.display_name()),
                None => println!("{} is not registered", id),
            }
        }
    }
    Ok(())
}

/// Wires the tic-tac-toe bot from configuration.
#[instrument(skip_all)]
fn build_bot(config: &BotConfig, channel: Arc<dyn MessageChannel>) -> Result<EventRouter<TicTacToeEngine>> {
    let identities: Arc<dyn IdentityResolver> = match config.db_path() {
        Some(path) => {
            let repo = ParticipantRepository::new(path.clone());
            repo.migrate()?;
            info!(%path, "Using participant database");
            Arc::new(repo)
        }
        None => Arc::new(DirectoryResolver::new(config.participants().clone())),
    };

    let renderer: Arc<dyn BoardRenderer> = if *config.case_by_side() {
        Arc::new(TextRenderer::case_by_side())
    } else {
        Arc::new(TextRenderer::new())
    };

    let correlator = SessionCorrelator::new(
        TicTacToeEngine,
        CorrelationRegistry::new(),
        renderer,
        identities,
        channel,
    );

    Ok(EventRouter::new(
        correlator,
        config.command().clone(),
        config.command_prefix().clone(),
    ))
}
