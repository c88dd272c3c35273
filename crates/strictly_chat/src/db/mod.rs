//! SQLite participant directory.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{NewParticipant, Participant};
pub use repository::{MIGRATIONS, ParticipantRepository};
