//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction. It is built once
//! from the loaded [`AppConfig`] and is read-only afterwards.

use crate::auth::JwtService;
use crate::config::AppConfig;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared application state
///
/// All fields are cheap to clone: the pool and the JWT keys are
/// reference-counted internally and the config sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Identity store connection pool
    pub db: SqlitePool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
}

impl AppState {
    /// Create a new application state
    ///
    /// Derives the JWT keys from the configured secret, so call this once
    /// at startup.
    pub fn new(db: SqlitePool, config: AppConfig) -> Self {
        let jwt = JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry_secs,
            config.jwt.refresh_token_expiry_secs,
        );

        Self {
            db,
            config: Arc::new(config),
            jwt,
        }
    }

    #[inline]
    pub fn db(&self) -> &SqlitePool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_jwt_service_follows_config() {
        let mut config = AppConfig::default();
        config.jwt.access_token_expiry_secs = 42;
        let pool = SqlitePool::connect_lazy("sqlite::memory:").unwrap();
        let state = AppState::new(pool, config);

        assert_eq!(state.config().jwt.access_token_expiry_secs, 42);

        let pair = state.clone().jwt().issue_pair(uuid::Uuid::new_v4()).unwrap();
        let claims = state.jwt().validate_access_token(&pair.access).unwrap();
        assert_eq!(claims.exp - claims.iat, 42);
    }
}
