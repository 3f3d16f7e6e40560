//! Authentication Service
//!
//! Account registration and credential login. Passwords are stored as
//! Argon2id hashes and compared with constant-time verification; the raw
//! credential never reaches storage.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::application::services::token_service::{TokenPair, TokenService};
use crate::domain::{User, UserRepository};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Storage(#[from] AppError),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::Conflict("Invalid credentials".into()),
            AuthError::UsernameExists => AppError::Conflict("Username already exists".into()),
            AuthError::UserNotFound => AppError::NotFound("User not found".into()),
            AuthError::Internal(msg) => AppError::Internal(msg),
            AuthError::Storage(e) => e,
        }
    }
}

/// Registration and login against the user directory.
pub struct AuthService<U: UserRepository> {
    user_repo: Arc<U>,
    tokens: TokenService,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: Arc<U>, tokens: TokenService, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self {
            user_repo,
            tokens,
            id_generator,
        }
    }

    /// Register a new account and issue its first token pair.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(User, TokenPair), AuthError> {
        if self.user_repo.username_exists(username).await? {
            return Err(AuthError::UsernameExists);
        }

        let password_hash = self.hash_password(password)?;
        let user = User {
            id: self.id_generator.generate(),
            username: username.to_string(),
            password_hash,
            created_at: Utc::now(),
        };

        let created = self.user_repo.create(&user).await?;
        let pair = self
            .tokens
            .issue_pair(&created.username)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(username = %created.username, "User registered");
        Ok((created, pair))
    }

    /// Authenticate username + password and issue a token pair.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self
            .tokens
            .issue_pair(&user.username)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(username = %user.username, "User logged in");
        Ok(pair)
    }

    /// Hash a password using Argon2id
    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against its hash
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::InMemoryUserRepository;
    use crate::config::JwtSettings;

    fn service() -> AuthService<InMemoryUserRepository> {
        let settings = JwtSettings {
            access_secret: "access-secret-0123456789-0123456789-01".into(),
            refresh_secret: "refresh-secret-0123456789-0123456789-0".into(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        };
        AuthService::new(
            Arc::new(InMemoryUserRepository::default()),
            TokenService::new(settings),
            Arc::new(SnowflakeGenerator::new(1)),
        )
    }

    #[tokio::test]
    async fn register_then_login() {
        let service = service();
        let (user, pair) = service.register("alice", "hunter2-hunter2").await.unwrap();
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "hunter2-hunter2");
        assert!(!pair.access_token.is_empty());

        let pair = service.login("alice", "hunter2-hunter2").await.unwrap();
        assert!(!pair.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let service = service();
        service.register("alice", "hunter2-hunter2").await.unwrap();
        let err = service.register("alice", "other-password").await.unwrap_err();
        assert!(matches!(err, AuthError::UsernameExists));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_indistinguishable() {
        let service = service();
        service.register("alice", "hunter2-hunter2").await.unwrap();

        let wrong = service.login("alice", "wrong-password").await.unwrap_err();
        let unknown = service.login("nobody", "whatever-pass").await.unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
    }
}
