//! Identity repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Identity record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

/// Input for creating an identity; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Outcome of an insert that may collide on the username
#[derive(Debug)]
pub enum CreateOutcome {
    Created(UserRecord),
    UsernameTaken,
}

/// Identity repository
pub struct UserRepository;

impl UserRepository {
    /// Insert a new identity.
    ///
    /// A username collision caught by the `UNIQUE` constraint is reported as
    /// [`CreateOutcome::UsernameTaken`]; the existing row is left untouched.
    pub async fn create(pool: &SqlitePool, new_user: NewUser<'_>) -> Result<CreateOutcome> {
        let result = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, username, email, password_hash, is_active, date_joined)
            VALUES (?, ?, ?, ?, 1, ?)
            RETURNING id, username, email, password_hash, is_active, date_joined
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_user.username)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(Utc::now())
        .fetch_one(pool)
        .await;

        match result {
            Ok(user) => Ok(CreateOutcome::Created(user)),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(CreateOutcome::UsernameTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Find identity by exact (case-sensitive) username
    pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, password_hash, is_active, date_joined
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find identity by ID
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, password_hash, is_active, date_joined
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Check if a username is taken
    pub async fn username_exists(pool: &SqlitePool, username: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)
            "#,
        )
        .bind(username)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn test_pool() -> SqlitePool {
        let pool = db::create_memory_pool().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        pool
    }

    fn alice(hash: &str) -> NewUser<'_> {
        NewUser {
            username: "alice",
            email: "a@x.com",
            password_hash: hash,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;

        let created = match UserRepository::create(&pool, alice("hash-1")).await.unwrap() {
            CreateOutcome::Created(user) => user,
            CreateOutcome::UsernameTaken => panic!("fresh username reported as taken"),
        };
        assert!(created.is_active);

        let by_name = UserRepository::find_by_username(&pool, "alice").await.unwrap().unwrap();
        let by_id = UserRepository::find_by_id(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_id.email, "a@x.com");
        assert!(UserRepository::username_exists(&pool, "alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_keeps_original() {
        let pool = test_pool().await;
        UserRepository::create(&pool, alice("hash-1")).await.unwrap();

        let second = UserRepository::create(&pool, alice("hash-2")).await.unwrap();
        assert!(matches!(second, CreateOutcome::UsernameTaken));

        let stored = UserRepository::find_by_username(&pool, "alice").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "hash-1");
    }

    #[tokio::test]
    async fn test_username_lookup_is_case_sensitive() {
        let pool = test_pool().await;
        UserRepository::create(&pool, alice("hash-1")).await.unwrap();

        assert!(!UserRepository::username_exists(&pool, "Alice").await.unwrap());
        assert!(UserRepository::find_by_username(&pool, "ALICE").await.unwrap().is_none());
    }
}
