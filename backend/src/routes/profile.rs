//! Profile route

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ProfileService;
use crate::state::AppState;
use accounts_shared::ProfileResponse;
use axum::{extract::State, routing::get, Json, Router};

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile/", get(get_profile))
}

/// GET /api/auth/profile/
///
/// Requires a Bearer access token; the extractor answers 401 otherwise.
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = ProfileService::get_profile(state.db(), auth.user_id).await?;
    Ok(Json(profile))
}
