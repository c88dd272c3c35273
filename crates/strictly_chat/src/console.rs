//! Line-oriented stand-in for a chat platform.
//!
//! Each stdin line is one chat message:
//!
//! ```text
//! alice !tictactoe @bob     command with a mention
//! bob >m1 5                 reply to message m1
//! ```
//!
//! Bot messages are echoed with their ids so they can be replied to.

use crate::events::{EventRouter, InboundEvent};
use crate::rules::RulesEngine;
use crate::session::MessageId;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};

/// Parses one console line into an event with id `message_id`.
///
/// Returns `None` for lines that are neither a prefixed command nor a reply.
pub fn parse_line(line: &str, prefix: &str, message_id: MessageId) -> Option<InboundEvent> {
    let mut words = line.split_whitespace();
    let sender = words.next()?.to_string();
    let head = words.next()?;

    if let Some(reply_to) = head.strip_prefix('>') {
        if reply_to.is_empty() {
            return None;
        }
        return Some(InboundEvent::Reply {
            message_id,
            reply_to: reply_to.to_string(),
            sender,
            text: words.collect::<Vec<_>>().join(" "),
        });
    }

    let command = head.strip_prefix(prefix)?;
    if command.is_empty() {
        return None;
    }
    let (mentions, args): (Vec<&str>, Vec<&str>) = words.partition(|w| w.starts_with('@'));

    Some(InboundEvent::Command {
        message_id,
        sender,
        command: command.to_string(),
        mentions: mentions
            .into_iter()
            .map(|m| m.trim_start_matches('@').to_string())
            .filter(|m| !m.is_empty())
            .collect(),
        args: args.into_iter().map(str::to_string).collect(),
    })
}

/// Reads events from stdin until EOF or `quit`.
#[instrument(skip(bot))]
pub async fn run_console<E: RulesEngine>(bot: Arc<EventRouter<E>>) -> anyhow::Result<()> {
    info!("Console ready");
    println!("Type `<you> {}<command> @<opponent>` to start, `<you> ><id> <move>` to reply, `quit` to leave.", bot.prefix());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut counter: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        counter += 1;
        let message_id = format!("c{}", counter);
        let Some(event) = parse_line(line, bot.prefix(), message_id.clone()) else {
            println!("?? could not read `{}`", line);
            continue;
        };
        println!("[{}] {}", message_id, line);

        match bot.dispatch(event).await {
            Ok(outcome) => debug!(?outcome, "Console event handled"),
            Err(e) => {
                warn!(error = %e, "Console event failed");
                println!("!! {}", e);
            }
        }
    }

    info!("Console closed");
    Ok(())
}
