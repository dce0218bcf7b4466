//! JWT token issuance and validation
//!
//! Login mints a refresh token for the identity and derives the access
//! token from the refresh claims, so both always name the same subject.
//! Keys are derived once from the configured secret and shared by `Arc`.

use accounts_shared::{AuthError, TokenPair};
use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Kind of token carried in the `token_type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (identity ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub token_type: TokenType,
    /// Unique token ID
    pub jti: String,
}

impl Claims {
    fn new(user_id: Uuid, token_type: TokenType, lifetime_secs: i64) -> Result<Self> {
        let now = Utc::now();
        let exp = Duration::try_seconds(lifetime_secs)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                anyhow::anyhow!("{:?} token lifetime of {}s is out of range", token_type, lifetime_secs)
            })?;

        Ok(Self {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type,
            jti: Uuid::new_v4().simple().to_string(),
        })
    }

    /// Identity the token was issued for
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken)
    }
}

/// Pre-computed signing and verification keys
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Token lifetimes
#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub access_secs: i64,
    pub refresh_secs: i64,
}

/// JWT service for token operations
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    lifetimes: TokenLifetimes,
}

impl JwtService {
    pub fn new(secret: &str, access_token_expiry_secs: i64, refresh_token_expiry_secs: i64) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            lifetimes: TokenLifetimes {
                access_secs: access_token_expiry_secs,
                refresh_secs: refresh_token_expiry_secs,
            },
        }
    }

    /// Issue a refresh token for a user plus an access token derived from it
    pub fn issue_pair(&self, user_id: Uuid) -> Result<TokenPair> {
        let refresh_claims = Claims::new(user_id, TokenType::Refresh, self.lifetimes.refresh_secs)?;
        let refresh = self.sign(&refresh_claims)?;
        let access = self.access_from_refresh(&refresh_claims)?;

        Ok(TokenPair { refresh, access })
    }

    /// Mint a new access token for the subject of validated refresh claims
    pub fn access_from_refresh(&self, refresh: &Claims) -> Result<String> {
        let user_id = refresh.user_id()?;
        let claims = Claims::new(user_id, TokenType::Access, self.lifetimes.access_secs)?;
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::default(), claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign {:?} token: {}", claims.token_type, e))
    }

    /// Validate signature and expiry, returning the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })
    }

    /// Validate a token and require it to be an access token
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_typed(token, TokenType::Access)
    }

    /// Validate a token and require it to be a refresh token
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_typed(token, TokenType::Refresh)
    }

    fn validate_typed(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != expected {
            return Err(AuthError::WrongTokenType);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret", 300, 86400)
    }

    #[test]
    fn test_issue_pair_tokens_are_distinct_and_typed() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();

        let pair = service.issue_pair(user_id).unwrap();
        assert!(!pair.refresh.is_empty());
        assert!(!pair.access.is_empty());
        assert_ne!(pair.refresh, pair.access);

        let access = service.validate_access_token(&pair.access).unwrap();
        let refresh = service.validate_refresh_token(&pair.refresh).unwrap();
        assert_eq!(access.sub, user_id.to_string());
        assert_eq!(refresh.sub, user_id.to_string());
        assert!(access.exp < refresh.exp);
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        let service = create_test_service();
        let pair = service.issue_pair(Uuid::new_v4()).unwrap();

        assert_eq!(
            service.validate_refresh_token(&pair.access).unwrap_err(),
            AuthError::WrongTokenType
        );
        assert_eq!(
            service.validate_access_token(&pair.refresh).unwrap_err(),
            AuthError::WrongTokenType
        );
    }

    #[test]
    fn test_access_from_refresh_keeps_subject() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();
        let pair = service.issue_pair(user_id).unwrap();

        let refresh = service.validate_refresh_token(&pair.refresh).unwrap();
        let access = service.access_from_refresh(&refresh).unwrap();
        let claims = service.validate_access_token(&access).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new("test-secret", -120, -120);
        let pair = service.issue_pair(Uuid::new_v4()).unwrap();

        assert_eq!(
            service.validate_access_token(&pair.access).unwrap_err(),
            AuthError::TokenExpired
        );
    }

    #[test]
    fn test_out_of_range_lifetime_is_error_not_panic() {
        let service = JwtService::new("test-secret", 300, i64::MAX);
        assert!(service.issue_pair(Uuid::new_v4()).is_err());

        let service = JwtService::new("test-secret", i64::MAX / 2, 86400);
        assert!(service.issue_pair(Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        assert_eq!(
            service.validate_token("invalid.token.here").unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = JwtService::new("other-secret", 300, 86400);
        let pair = other.issue_pair(Uuid::new_v4()).unwrap();

        let service = create_test_service();
        assert_eq!(
            service.validate_access_token(&pair.access).unwrap_err(),
            AuthError::InvalidToken
        );
    }
}
