//! Token Service
//!
//! Issues and verifies the two JWT kinds: short-lived access tokens and
//! long-lived refresh tokens, each signed with its own secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtSettings;

/// JWT claims structure. The subject is the username; identity downstream
/// is always derived from these verified claims, never from request fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// A freshly issued access + refresh pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token issue failures. Verification never errors; only minting can.
#[derive(Debug, thiserror::Error)]
#[error("Token generation failed: {0}")]
pub struct TokenIssueError(#[from] jsonwebtoken::errors::Error);

/// Stateless issuer/verifier for both token kinds.
#[derive(Clone)]
pub struct TokenService {
    settings: JwtSettings,
}

impl TokenService {
    pub fn new(settings: JwtSettings) -> Self {
        Self { settings }
    }

    /// Issue a short-lived access token for the given username.
    pub fn issue_access_token(&self, username: &str) -> Result<String, TokenIssueError> {
        self.issue(
            username,
            Duration::minutes(self.settings.access_token_expiry_minutes),
            &self.settings.access_secret,
        )
    }

    /// Issue a long-lived refresh token for the given username.
    pub fn issue_refresh_token(&self, username: &str) -> Result<String, TokenIssueError> {
        self.issue(
            username,
            Duration::days(self.settings.refresh_token_expiry_days),
            &self.settings.refresh_secret,
        )
    }

    /// Issue a matched access + refresh pair.
    pub fn issue_pair(&self, username: &str) -> Result<TokenPair, TokenIssueError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(username)?,
            refresh_token: self.issue_refresh_token(username)?,
        })
    }

    /// Verify an access token. Signature mismatch, malformed input and
    /// expiry all collapse into `None` so callers can fall back to the
    /// refresh token without learning why the access token failed.
    pub fn verify_access(&self, token: &str) -> Option<Claims> {
        self.verify(token, &self.settings.access_secret)
    }

    /// Verify a refresh token against the refresh secret.
    pub fn verify_refresh(&self, token: &str) -> Option<Claims> {
        self.verify(token, &self.settings.refresh_secret)
    }

    fn issue(
        &self,
        username: &str,
        ttl: Duration,
        secret: &str,
    ) -> Result<String, TokenIssueError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?)
    }

    fn verify(&self, token: &str, secret: &str) -> Option<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn test_settings() -> JwtSettings {
        JwtSettings {
            access_secret: "access-secret-0123456789-0123456789-01".into(),
            refresh_secret: "refresh-secret-0123456789-0123456789-0".into(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        }
    }

    #[test]
    fn access_token_roundtrip() {
        let service = TokenService::new(test_settings());
        let token = service.issue_access_token("alice").unwrap();
        let claims = service.verify_access(&token).expect("valid token");
        assert_eq!(claims.sub, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_kinds_are_not_interchangeable() {
        let service = TokenService::new(test_settings());
        let access = service.issue_access_token("alice").unwrap();
        let refresh = service.issue_refresh_token("alice").unwrap();
        assert!(service.verify_refresh(&access).is_none());
        assert!(service.verify_access(&refresh).is_none());
    }

    #[test]
    fn garbage_and_wrong_signature_are_plain_none() {
        let service = TokenService::new(test_settings());
        assert!(service.verify_access("not-a-jwt").is_none());

        let mut other = test_settings();
        other.access_secret = "a-completely-different-secret-value-!!".into();
        let foreign = TokenService::new(other)
            .issue_access_token("mallory")
            .unwrap();
        assert!(service.verify_access(&foreign).is_none());
    }

    #[test]
    fn expired_access_token_is_rejected() {
        let mut settings = test_settings();
        settings.access_token_expiry_minutes = -5;
        let service = TokenService::new(settings);
        let token = service.issue_access_token("alice").unwrap();
        assert!(service.verify_access(&token).is_none());
    }
}
