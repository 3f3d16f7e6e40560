//! Message Repository Implementation
//!
//! PostgreSQL implementation of the MessageRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Message, MessageRepository};
use crate::shared::error::AppError;

/// Database row representation matching the `messages` table schema.
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    chat_id: i64,
    sender_id: i64,
    content: String,
    is_read: bool,
    media_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self) -> Message {
        Message {
            id: self.id,
            chat_id: self.chat_id,
            sender_id: self.sender_id,
            content: self.content,
            is_read: self.is_read,
            media_url: self.media_url,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL message repository implementation.
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Message>, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, chat_id, sender_id, content, is_read, media_url, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_message()))
    }

    async fn find_by_chat(&self, chat_id: i64) -> Result<Vec<Message>, AppError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, chat_id, sender_id, content, is_read, media_url, created_at
            FROM messages
            WHERE chat_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_message()).collect())
    }

    async fn create(&self, message: &Message) -> Result<Message, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (id, chat_id, sender_id, content, is_read, media_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, chat_id, sender_id, content, is_read, media_url, created_at
            "#,
        )
        .bind(message.id)
        .bind(message.chat_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(message.is_read)
        .bind(&message.media_url)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_message())
    }
}
