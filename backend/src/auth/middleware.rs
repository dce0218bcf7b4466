//! Bearer-token authentication extractor
//!
//! Handlers that take an [`AuthUser`] only run once the request carries a
//! valid, unexpired access token. Everything else is answered with 401 here.

use crate::error::ApiError;
use crate::state::AppState;
use accounts_shared::AuthError;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;
use uuid::Uuid;

/// Authenticated caller extracted from the access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = bearer_token(header)?;

        let claims = app_state.jwt().validate_access_token(token).map_err(|e| {
            debug!(reason = %e, "Access token rejected");
            e
        })?;

        Ok(AuthUser {
            user_id: claims.user_id()?,
        })
    }
}

/// Strip the `Bearer` scheme from an Authorization header value
fn bearer_token(header: &str) -> Result<&str, AuthError> {
    match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AuthError::MalformedHeader),
    }
}
