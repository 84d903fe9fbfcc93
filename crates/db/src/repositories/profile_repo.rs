//! Repository for the `profiles` table.

use std::collections::HashMap;

use sqlx::PgPool;
use lodge_core::types::DbId;

use crate::models::profile::Profile;

const COLUMNS: &str = "id, full_name, created_at, updated_at";

pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles ORDER BY full_name ASC");
        sqlx::query_as::<_, Profile>(&query).fetch_all(pool).await
    }

    /// The whole directory as `user id -> full name`.
    pub async fn directory(pool: &PgPool) -> Result<HashMap<DbId, String>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (DbId, String)>("SELECT id, full_name FROM profiles")
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().collect())
    }
}
