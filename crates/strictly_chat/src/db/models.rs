//! Database models.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::schema;

/// A registered participant and the name shown for them.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::participants)]
pub struct Participant {
    id: String,
    display_name: String,
    updated_at: NaiveDateTime,
}

/// Insertable participant row.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::participants)]
pub struct NewParticipant {
    id: String,
    display_name: String,
}
