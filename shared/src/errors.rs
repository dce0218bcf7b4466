//! Error types for the accounts service

use thiserror::Error;

/// Authentication error types
///
/// The display text of each variant is what a client sees in the
/// `error` field of a 401 response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has wrong type")]
    WrongTokenType,

    #[error("Missing authorization header")]
    MissingToken,

    #[error("Invalid authorization format")]
    MalformedHeader,

    #[error("User not found")]
    UnknownUser,

    #[error("User is inactive")]
    InactiveUser,
}
