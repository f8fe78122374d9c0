//! Driver model
//!
//! Maps to the `drivers` table.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A truck driver that collection points get assigned to
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Driver {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
