//! Registration, login and token refresh
//!
//! Password hashing and verification run on the blocking thread pool; the
//! JWT service is borrowed from `AppState` with its keys already derived.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{CreateOutcome, NewUser, UserRecord, UserRepository};
use accounts_shared::{AccessToken, AuthError, LoginRequest, RegisterRequest, TokenPair};
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

pub const USERNAME_TAKEN: &str = "Username already exists";

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new identity. No tokens are issued; the caller logs in next.
    pub async fn register(pool: &SqlitePool, req: RegisterRequest) -> Result<UserRecord, ApiError> {
        if UserRepository::username_exists(pool, &req.username).await? {
            info!(username = %req.username, "Registration rejected: username taken");
            return Err(ApiError::BadRequest(USERNAME_TAKEN.to_string()));
        }

        let password_hash = PasswordService::hash_async(req.password).await?;
        let email = req.email.unwrap_or_default();

        let outcome = UserRepository::create(
            pool,
            NewUser {
                username: &req.username,
                email: &email,
                password_hash: &password_hash,
            },
        )
        .await?;

        match outcome {
            CreateOutcome::Created(user) => {
                info!(user_id = %user.id, username = %user.username, "User registered");
                Ok(user)
            }
            // Lost a race with a concurrent registration of the same name
            CreateOutcome::UsernameTaken => Err(ApiError::BadRequest(USERNAME_TAKEN.to_string())),
        }
    }

    /// Verify credentials and issue a refresh/access token pair.
    ///
    /// Unknown user, wrong password and inactive account all yield the same
    /// `InvalidCredentials` error.
    pub async fn login(
        pool: &SqlitePool,
        jwt_service: &JwtService,
        req: LoginRequest,
    ) -> Result<TokenPair, ApiError> {
        let Some(user) = UserRepository::find_by_username(pool, &req.username).await? else {
            PasswordService::burn_async(req.password).await?;
            warn!(username = %req.username, "Login failed: unknown username");
            return Err(AuthError::InvalidCredentials.into());
        };

        let valid = PasswordService::verify_async(req.password, user.password_hash.clone()).await?;
        if !valid || !user.is_active {
            warn!(user_id = %user.id, active = user.is_active, "Login failed");
            return Err(AuthError::InvalidCredentials.into());
        }

        let tokens = jwt_service.issue_pair(user.id)?;
        info!(user_id = %user.id, "User logged in");
        Ok(tokens)
    }

    /// Mint a fresh access token from a refresh token. The refresh token is
    /// not rotated.
    pub async fn refresh_access(
        pool: &SqlitePool,
        jwt_service: &JwtService,
        refresh_token: &str,
    ) -> Result<AccessToken, ApiError> {
        let claims = jwt_service.validate_refresh_token(refresh_token)?;
        Self::resolve_active(pool, claims.user_id()?).await?;

        let access = jwt_service.access_from_refresh(&claims)?;
        Ok(AccessToken { access })
    }

    /// Load the identity behind a verified token, rejecting missing or
    /// deactivated accounts with 401.
    pub async fn resolve_active(pool: &SqlitePool, user_id: Uuid) -> Result<UserRecord, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        if !user.is_active {
            return Err(AuthError::InactiveUser.into());
        }
        Ok(user)
    }
}
