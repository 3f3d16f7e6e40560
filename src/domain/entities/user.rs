//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a registered user account.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - username: VARCHAR NOT NULL UNIQUE
/// - password_hash: TEXT NOT NULL (Argon2id PHC string)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Unique username, also the identity carried in token claims
    pub username: String,

    /// Argon2id hash of the password, never the raw credential
    pub password_hash: String,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,
}

/// Repository trait for User data access operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Find multiple users by ID, in no particular order. IDs with no
    /// matching user are simply absent from the result.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, AppError>;

    /// List all users (id and username directory listing).
    async fn list_all(&self) -> Result<Vec<User>, AppError>;

    /// Create a new user.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Check if a username is taken.
    async fn username_exists(&self, username: &str) -> Result<bool, AppError>;
}
