//! Profile service

use crate::error::ApiError;
use crate::repositories::ProfileRepository;
use crate::services::UserService;
use accounts_shared::ProfileResponse;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

/// Profile service for the authenticated caller
pub struct ProfileService;

impl ProfileService {
    /// Return the caller's identity fields, materializing the profile row on
    /// first access.
    pub async fn get_profile(pool: &SqlitePool, user_id: Uuid) -> Result<ProfileResponse, ApiError> {
        let user = UserService::resolve_active(pool, user_id).await?;

        let (profile, created) = ProfileRepository::get_or_create(pool, user.id).await?;
        if created {
            info!(user_id = %user.id, profile_id = %profile.id, "Profile created");
        }

        Ok(ProfileResponse {
            username: user.username,
            email: user.email,
        })
    }
}
