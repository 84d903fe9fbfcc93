//! Display profile attached to every user.

use serde::Serialize;
use sqlx::FromRow;
use lodge_core::types::{DbId, Timestamp};

/// A row from the `profiles` table. `id` is the owning user's id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub full_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
