//! In-memory repository fakes for service-level tests.
//!
//! These back the service unit tests with deterministic storage so the
//! flows can be exercised without a database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{
    Chat, ChatRepository, Message, MessageRepository, User, UserRepository,
};
use crate::shared::error::AppError;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<i64, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict("Username already exists".into()));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.username == username))
    }
}

#[derive(Default)]
pub struct InMemoryChatRepository {
    chats: Mutex<HashMap<i64, Chat>>,
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Chat>, AppError> {
        Ok(self.chats.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_participant(&self, user_id: i64) -> Result<Vec<Chat>, AppError> {
        let mut chats: Vec<Chat> = self
            .chats
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.has_participant(user_id))
            .cloned()
            .collect();
        chats.sort_by_key(|c| c.id);
        Ok(chats)
    }

    async fn find_private_pair(&self, a: i64, b: i64) -> Result<Option<Chat>, AppError> {
        Ok(self
            .chats
            .lock()
            .unwrap()
            .values()
            .find(|c| !c.is_group && c.has_participant(a) && c.has_participant(b))
            .cloned())
    }

    async fn create(&self, chat: &Chat) -> Result<Chat, AppError> {
        self.chats.lock().unwrap().insert(chat.id, chat.clone());
        Ok(chat.clone())
    }

    async fn set_last_message(&self, chat_id: i64, message_id: i64) -> Result<(), AppError> {
        let mut chats = self.chats.lock().unwrap();
        let chat = chats
            .get_mut(&chat_id)
            .ok_or_else(|| AppError::NotFound("Chat not found".into()))?;
        chat.last_message_id = Some(message_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: Mutex<Vec<Message>>,
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Message>, AppError> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn find_by_chat(&self, chat_id: i64) -> Result<Vec<Message>, AppError> {
        let mut messages: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(messages)
    }

    async fn create(&self, message: &Message) -> Result<Message, AppError> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(message.clone())
    }
}
