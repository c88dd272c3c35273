//! Participant display names.

use crate::db::ParticipantRepository;
use crate::session::ParticipantId;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Name shown for participants the resolver does not know.
pub const UNKNOWN_PARTICIPANT: &str = "Unknown";

/// Maps participant ids to display names.
#[async_trait::async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Returns the display name, or [`UNKNOWN_PARTICIPANT`].
    async fn display_name(&self, id: &str) -> String;
}

/// Fixed directory of names, usually the `[participants]` table of the
/// configuration file.
#[derive(Debug, Clone, Default)]
pub struct DirectoryResolver {
    names: HashMap<ParticipantId, String>,
}

impl DirectoryResolver {
    /// Creates a resolver over `names`.
    #[instrument(skip(names), fields(count = names.len()))]
    pub fn new(names: HashMap<ParticipantId, String>) -> Self {
        debug!("Creating directory resolver");
        Self { names }
    }
}

#[async_trait::async_trait]
impl IdentityResolver for DirectoryResolver {
    async fn display_name(&self, id: &str) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_PARTICIPANT.to_string())
    }
}

/// Looks names up on the blocking pool; each lookup opens its own
/// connection.
#[async_trait::async_trait]
impl IdentityResolver for ParticipantRepository {
    #[instrument(skip(self))]
    async fn display_name(&self, id: &str) -> String {
        let repo = self.clone();
        let key = id.to_string();
        match tokio::task::spawn_blocking(move || repo.get(&key)).await {
            Ok(Ok(Some(participant))) => participant.display_name().clone(),
            Ok(Ok(None)) => {
                debug!("Participant not registered");
                UNKNOWN_PARTICIPANT.to_string()
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Participant lookup failed");
                UNKNOWN_PARTICIPANT.to_string()
            }
            Err(e) => {
                warn!(error = %e, "Participant lookup task failed");
                UNKNOWN_PARTICIPANT.to_string()
            }
        }
    }
}
