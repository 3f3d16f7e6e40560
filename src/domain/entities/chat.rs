//! Chat entity and repository trait.
//!
//! A chat is a thread between two users (private) or several (group).
//! Maps to the `chats` and `chat_participants` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a chat thread.
///
/// Invariants:
/// - at least two unique participants
/// - non-group chats have exactly two participants, and at most one chat
///   exists per unordered participant pair (enforced at creation)
/// - `group_name` and `group_admin_id` are present iff `is_group`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Participant user IDs; order carries no meaning
    pub participants: Vec<i64>,

    /// Whether this is a group chat
    pub is_group: bool,

    /// Group display name (group chats only)
    pub group_name: Option<String>,

    /// Creator of the group (group chats only)
    pub group_admin_id: Option<i64>,

    /// Most recently accepted message, if any
    pub last_message_id: Option<i64>,

    /// Timestamp when the chat was created
    pub created_at: DateTime<Utc>,
}

impl Chat {
    /// Check whether a user is a participant of this chat.
    pub fn has_participant(&self, user_id: i64) -> bool {
        self.participants.contains(&user_id)
    }
}

/// Repository trait for Chat data access operations.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Find a chat by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Chat>, AppError>;

    /// Find all chats a user participates in.
    async fn find_by_participant(&self, user_id: i64) -> Result<Vec<Chat>, AppError>;

    /// Find the non-group chat between two users, if one exists.
    /// The pair is unordered: (a, b) and (b, a) resolve identically.
    async fn find_private_pair(&self, a: i64, b: i64) -> Result<Option<Chat>, AppError>;

    /// Create a new chat together with its participant rows.
    async fn create(&self, chat: &Chat) -> Result<Chat, AppError>;

    /// Point the chat's last-message reference at a newly accepted message.
    async fn set_last_message(&self, chat_id: i64, message_id: i64) -> Result<(), AppError>;
}
