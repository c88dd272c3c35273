//! Database repository for participant names.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, NewParticipant, Participant, schema};

/// Schema migrations bundled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for the participant directory.
#[derive(Debug, Clone)]
pub struct ParticipantRepository {
    db_path: String,
}

impl ParticipantRepository {
    /// Creates a repository for the database at the given path.
    ///
    /// No connection is opened until the first query.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Self {
        info!(path = %db_path, "Creating ParticipantRepository");
        Self { db_path }
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or a migration fails.
    #[instrument(skip(self))]
    pub fn migrate(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Registers a participant, replacing the display name if the id is known.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn upsert(&self, id: String, display_name: String) -> Result<Participant, DbError> {
        debug!("Upserting participant");
        let mut conn = self.connection()?;

        let row = NewParticipant::new(id.clone(), display_name.clone());
        diesel::insert_into(schema::participants::table)
            .values(&row)
            .on_conflict(schema::participants::id)
            .do_update()
            .set((
                schema::participants::display_name.eq(&display_name),
                schema::participants::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;

        let participant = schema::participants::table
            .find(&id)
            .select(Participant::as_select())
            .first(&mut conn)?;

        info!(id = %participant.id(), name = %participant.display_name(), "Participant saved");
        Ok(participant)
    }

    /// Gets a participant by id. Returns `None` if not registered.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Result<Option<Participant>, DbError> {
        let mut conn = self.connection()?;

        let participant = schema::participants::table
            .find(id)
            .select(Participant::as_select())
            .first(&mut conn)
            .optional()?;

        debug!(found = participant.is_some(), "Participant lookup");
        Ok(participant)
    }

    /// Lists all participants ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Participant>, DbError> {
        let mut conn = self.connection()?;

        let participants = schema::participants::table
            .order(schema::participants::id.asc())
            .select(Participant::as_select())
            .load(&mut conn)?;

        debug!(count = participants.len(), "Participants loaded");
        Ok(participants)
    }
}
