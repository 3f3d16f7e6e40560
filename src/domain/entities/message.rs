//! Message entity and repository trait.
//!
//! Maps to the `messages` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a message sent in a chat.
///
/// Messages are created exactly once when a send event is accepted and are
/// immutable thereafter. `created_at` is server-assigned; snowflake ids give
/// the acceptance order within a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Chat this message belongs to
    pub chat_id: i64,

    /// Author user ID
    pub sender_id: i64,

    /// Message text (non-empty)
    pub content: String,

    /// Read flag, false until the recipient opens the chat
    pub is_read: bool,

    /// Optional media attachment reference
    pub media_url: Option<String>,

    /// Timestamp when the message was accepted
    pub created_at: DateTime<Utc>,
}

/// Repository trait for Message data access operations.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find a message by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Message>, AppError>;

    /// Find all messages in a chat, ascending by creation time.
    async fn find_by_chat(&self, chat_id: i64) -> Result<Vec<Message>, AppError>;

    /// Create a new message.
    async fn create(&self, message: &Message) -> Result<Message, AppError>;
}
