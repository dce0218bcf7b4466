//! Authentication routes
//!
//! Registration, login and access-token refresh. Bodies are validated by
//! [`ValidatedJson`] before any handler logic runs.

use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::services::UserService;
use crate::state::AppState;
use accounts_shared::{AccessToken, LoginRequest, MessageResponse, RefreshRequest, RegisterRequest, TokenPair};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register/", post(register))
        .route("/login/", post(login))
        .route("/token/refresh/", post(refresh_token))
}

/// Register a new user
///
/// POST /api/auth/register/
async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    UserService::register(state.db(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully")),
    ))
}

/// Login with username and password
///
/// POST /api/auth/login/
async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<TokenPair>> {
    let tokens = UserService::login(state.db(), state.jwt(), req).await?;
    Ok(Json(tokens))
}

/// Exchange a refresh token for a new access token
///
/// POST /api/auth/token/refresh/
async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> ApiResult<Json<AccessToken>> {
    let token = UserService::refresh_access(state.db(), state.jwt(), &req.refresh).await?;
    Ok(Json(token))
}
