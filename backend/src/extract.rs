//! Validated JSON body extractor
//!
//! Deserializes the body into a typed request and runs its `validator`
//! rules. Missing fields, wrong types, broken JSON and rule violations all
//! become a 400 before the handler is called.

use crate::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;
use validator::{Validate, ValidationErrors};

/// JSON body that has passed deserialization and validation
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                warn!(error = %rejection, "Request body rejected");
                ApiError::Validation(rejection.body_text())
            })?;

        value.validate().map_err(|errors| {
            warn!(error = %errors, "Request validation failed");
            ApiError::Validation(first_message(&errors))
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Pick the first human-readable message out of a validation report
fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}
