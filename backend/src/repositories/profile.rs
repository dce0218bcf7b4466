//! Profile repository
//!
//! A profile row is the lazily created one-to-one companion of an identity.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Profile record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Profile repository
pub struct ProfileRepository;

impl ProfileRepository {
    /// Fetch the profile for a user, creating it on first access.
    ///
    /// The insert is a no-op when `UNIQUE(user_id)` already holds a row, so
    /// concurrent first fetches converge on one profile. Returns the profile
    /// and whether this call created it.
    pub async fn get_or_create(pool: &SqlitePool, user_id: Uuid) -> Result<(ProfileRecord, bool)> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO profiles (id, user_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(Utc::now())
        .execute(pool)
        .await?
        .rows_affected();

        let profile = sqlx::query_as::<_, ProfileRecord>(
            r#"
            SELECT id, user_id, created_at
            FROM profiles
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok((profile, inserted == 1))
    }
}
