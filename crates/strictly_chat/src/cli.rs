//! Command-line interface for strictly_chat.

use clap::{Parser, Subcommand};

/// Strictly Chat - reply-driven board games for chat platforms
#[derive(Parser, Debug)]
#[command(name = "strictly_chat")]
#[command(about = "Turn-based games played by replying to the bot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Accept chat events over HTTP
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Path to bot configuration
        #[arg(short, long, default_value = "strictly_chat.toml")]
        config: std::path::PathBuf,
    },

    /// Play in the terminal, one line per chat message
    Console {
        /// Path to bot configuration
        #[arg(short, long, default_value = "strictly_chat.toml")]
        config: std::path::PathBuf,
    },

    /// Manage the participant directory
    Participant {
        /// Directory operation
        #[command(subcommand)]
        action: ParticipantCommand,
    },
}

/// Participant directory operations
#[derive(Subcommand, Debug)]
pub enum ParticipantCommand {
    /// Register a participant or rename one
    Add {
        /// Platform participant id
        id: String,

        /// Name shown in turn prompts
        name: String,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long, default_value = "strictly_chat.db")]
        db_path: String,
    },

    /// Show a participant's display name
    Show {
        /// Platform participant id
        id: String,

        /// Path to the database file
        #[arg(long, default_value = "strictly_chat.db")]
        db_path: String,
    },
}
