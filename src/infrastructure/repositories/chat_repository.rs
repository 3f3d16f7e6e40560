//! Chat Repository Implementation
//!
//! PostgreSQL implementation of the ChatRepository trait. Chats span two
//! tables: `chats` for the thread itself and `chat_participants` for the
//! membership set, aggregated into one row per chat on read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Chat, ChatRepository};
use crate::shared::error::AppError;

const CHAT_SELECT: &str = r#"
    SELECT c.id, c.is_group, c.group_name, c.group_admin_id, c.last_message_id,
           c.created_at, ARRAY_AGG(p.user_id) AS participants
    FROM chats c
    JOIN chat_participants p ON p.chat_id = c.id
"#;

/// Database row with the participant set aggregated in.
#[derive(Debug, sqlx::FromRow)]
struct ChatRow {
    id: i64,
    is_group: bool,
    group_name: Option<String>,
    group_admin_id: Option<i64>,
    last_message_id: Option<i64>,
    created_at: DateTime<Utc>,
    participants: Vec<i64>,
}

impl ChatRow {
    fn into_chat(self) -> Chat {
        Chat {
            id: self.id,
            participants: self.participants,
            is_group: self.is_group,
            group_name: self.group_name,
            group_admin_id: self.group_admin_id,
            last_message_id: self.last_message_id,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL chat repository implementation.
#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Chat>, AppError> {
        let row = sqlx::query_as::<_, ChatRow>(&format!(
            "{CHAT_SELECT} WHERE c.id = $1 GROUP BY c.id"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_chat()))
    }

    async fn find_by_participant(&self, user_id: i64) -> Result<Vec<Chat>, AppError> {
        let rows = sqlx::query_as::<_, ChatRow>(&format!(
            r#"{CHAT_SELECT}
            WHERE c.id IN (SELECT chat_id FROM chat_participants WHERE user_id = $1)
            GROUP BY c.id
            ORDER BY c.created_at
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_chat()).collect())
    }

    async fn find_private_pair(&self, a: i64, b: i64) -> Result<Option<Chat>, AppError> {
        let row = sqlx::query_as::<_, ChatRow>(&format!(
            r#"{CHAT_SELECT}
            WHERE c.is_group = FALSE
              AND c.id IN (
                  SELECT chat_id FROM chat_participants WHERE user_id = $1
                  INTERSECT
                  SELECT chat_id FROM chat_participants WHERE user_id = $2
              )
            GROUP BY c.id
            LIMIT 1
            "#
        ))
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_chat()))
    }

    async fn create(&self, chat: &Chat) -> Result<Chat, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO chats (id, is_group, group_name, group_admin_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(chat.id)
        .bind(chat.is_group)
        .bind(&chat.group_name)
        .bind(chat.group_admin_id)
        .bind(chat.created_at)
        .execute(&mut *tx)
        .await?;

        for user_id in &chat.participants {
            sqlx::query("INSERT INTO chat_participants (chat_id, user_id) VALUES ($1, $2)")
                .bind(chat.id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(chat.clone())
    }

    async fn set_last_message(&self, chat_id: i64, message_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE chats SET last_message_id = $2 WHERE id = $1")
            .bind(chat_id)
            .bind(message_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Chat with id {} not found",
                chat_id
            )));
        }

        Ok(())
    }
}
