//! Chat Directory Service
//!
//! Creates and resolves chat threads, authorizes a user's access to a
//! thread, and records accepted messages. Private chats are deduplicated
//! per unordered participant pair; access checks collapse "absent" and
//! "not a participant" into one outcome so non-participants cannot probe
//! for a chat's existence.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::domain::{Chat, ChatRepository, Message, MessageRepository, User, UserRepository};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Chat directory errors
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Cannot create a chat with yourself")]
    SelfChat,

    #[error("Participant not found")]
    ParticipantNotFound,

    #[error("One or more participants not found")]
    ParticipantsNotFound,

    #[error("Group chat requires at least one other participant")]
    GroupTooSmall,

    /// Chat absent or caller not a participant; deliberately one outcome.
    #[error("Chat not found")]
    NotFound,

    #[error("User not found")]
    UserNotFound,

    #[error(transparent)]
    Storage(#[from] AppError),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::SelfChat => AppError::Conflict("Cannot create a chat with yourself".into()),
            ChatError::ParticipantNotFound => AppError::NotFound("Participant not found".into()),
            ChatError::ParticipantsNotFound => {
                AppError::Conflict("One or more participants not found".into())
            }
            ChatError::GroupTooSmall => {
                AppError::Conflict("Group chat requires at least one other participant".into())
            }
            ChatError::NotFound => AppError::NotFound("Chat not found or access denied".into()),
            ChatError::UserNotFound => AppError::NotFound("User not found".into()),
            ChatError::Storage(e) => e,
        }
    }
}

/// Participant as exposed over the API (string id for JS clients).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub id: String,
    pub username: String,
}

/// Message as exposed over the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub chat_id: String,
    pub sender: ParticipantDto,
    pub content: String,
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    pub timestamp: String,
}

/// Chat as exposed over the API, populated with participant usernames and
/// the last message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDto {
    pub id: String,
    pub participants: Vec<ParticipantDto>,
    pub is_group: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_admin: Option<String>,
    pub last_message: Option<MessageDto>,
    pub created_at: String,
}

/// Outcome of private-chat creation, preserving the HTTP 200-found vs
/// 201-created distinction.
#[derive(Debug)]
pub enum ChatCreation {
    Created(ChatDto),
    Existing(ChatDto),
}

impl ChatCreation {
    pub fn into_inner(self) -> ChatDto {
        match self {
            ChatCreation::Created(chat) | ChatCreation::Existing(chat) => chat,
        }
    }
}

/// Chat directory over the user, chat and message repositories.
pub struct ChatService<U, C, M>
where
    U: UserRepository,
    C: ChatRepository,
    M: MessageRepository,
{
    user_repo: Arc<U>,
    chat_repo: Arc<C>,
    message_repo: Arc<M>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<U, C, M> ChatService<U, C, M>
where
    U: UserRepository,
    C: ChatRepository,
    M: MessageRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        chat_repo: Arc<C>,
        message_repo: Arc<M>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            user_repo,
            chat_repo,
            message_repo,
            id_generator,
        }
    }

    /// Resolve the caller's account from a verified claim username.
    pub async fn resolve_user(&self, username: &str) -> Result<User, ChatError> {
        self.user_repo
            .find_by_username(username)
            .await?
            .ok_or(ChatError::UserNotFound)
    }

    /// All chats the user participates in, populated.
    pub async fn list_chats(&self, username: &str) -> Result<Vec<ChatDto>, ChatError> {
        let user = self.resolve_user(username).await?;
        let chats = self.chat_repo.find_by_participant(user.id).await?;

        let mut out = Vec::with_capacity(chats.len());
        for chat in chats {
            out.push(self.populate(&chat).await?);
        }
        Ok(out)
    }

    /// Create (or return the existing) private chat between the caller and
    /// another user. At most one non-group chat exists per unordered pair.
    pub async fn create_private_chat(
        &self,
        username: &str,
        participant_id: i64,
    ) -> Result<ChatCreation, ChatError> {
        let user = self.resolve_user(username).await?;

        if participant_id == user.id {
            return Err(ChatError::SelfChat);
        }

        if self.user_repo.find_by_id(participant_id).await?.is_none() {
            return Err(ChatError::ParticipantNotFound);
        }

        if let Some(existing) = self
            .chat_repo
            .find_private_pair(user.id, participant_id)
            .await?
        {
            return Ok(ChatCreation::Existing(self.populate(&existing).await?));
        }

        let chat = Chat {
            id: self.id_generator.generate(),
            participants: vec![user.id, participant_id],
            is_group: false,
            group_name: None,
            group_admin_id: None,
            last_message_id: None,
            created_at: Utc::now(),
        };

        let created = self.chat_repo.create(&chat).await?;
        tracing::info!(chat_id = created.id, user_id = user.id, "Private chat created");
        Ok(ChatCreation::Created(self.populate(&created).await?))
    }

    /// Create a group chat; participants are the union of the supplied ids
    /// and the creator, who becomes the group admin.
    pub async fn create_group_chat(
        &self,
        username: &str,
        participant_ids: &[i64],
        group_name: &str,
    ) -> Result<ChatDto, ChatError> {
        let user = self.resolve_user(username).await?;

        let unique: BTreeSet<i64> = participant_ids.iter().copied().collect();
        let found = self
            .user_repo
            .find_by_ids(&unique.iter().copied().collect::<Vec<_>>())
            .await?;
        if found.len() != unique.len() {
            return Err(ChatError::ParticipantsNotFound);
        }

        let mut participants = unique;
        participants.insert(user.id);

        // A chat needs at least two unique participants; a supplied list
        // that is empty or names only the creator collapses to one.
        if participants.len() < 2 {
            return Err(ChatError::GroupTooSmall);
        }

        let chat = Chat {
            id: self.id_generator.generate(),
            participants: participants.into_iter().collect(),
            is_group: true,
            group_name: Some(group_name.to_string()),
            group_admin_id: Some(user.id),
            last_message_id: None,
            created_at: Utc::now(),
        };

        let created = self.chat_repo.create(&chat).await?;
        tracing::info!(chat_id = created.id, user_id = user.id, "Group chat created");
        self.populate(&created).await
    }

    /// Fetch a chat with its full history, only for participants. A missing
    /// chat and a forbidden chat yield the identical `NotFound`.
    pub async fn get_chat_for_user(
        &self,
        chat_id: i64,
        username: &str,
    ) -> Result<(ChatDto, Vec<MessageDto>), ChatError> {
        let user = self.resolve_user(username).await?;

        let chat = match self.chat_repo.find_by_id(chat_id).await? {
            Some(chat) if chat.has_participant(user.id) => chat,
            _ => return Err(ChatError::NotFound),
        };

        let users = self.participant_index(&chat).await?;
        let messages = self
            .message_repo
            .find_by_chat(chat.id)
            .await?
            .into_iter()
            .map(|m| message_dto(&m, &users))
            .collect();

        let dto = self.populate(&chat).await?;
        Ok((dto, messages))
    }

    /// Accept a message into a chat: authorize membership, persist, then
    /// advance the chat's last-message pointer. This is the ordering point
    /// for delivery; callers broadcast only after this returns.
    pub async fn append_message(
        &self,
        chat_id: i64,
        sender: &User,
        content: &str,
    ) -> Result<Message, ChatError> {
        let chat = match self.chat_repo.find_by_id(chat_id).await? {
            Some(chat) if chat.has_participant(sender.id) => chat,
            _ => return Err(ChatError::NotFound),
        };

        let message = Message {
            id: self.id_generator.generate(),
            chat_id: chat.id,
            sender_id: sender.id,
            content: content.to_string(),
            is_read: false,
            media_url: None,
            created_at: Utc::now(),
        };

        let created = self.message_repo.create(&message).await?;
        self.chat_repo.set_last_message(chat.id, created.id).await?;
        Ok(created)
    }

    /// Build the id -> user index for a chat's participants.
    async fn participant_index(&self, chat: &Chat) -> Result<HashMap<i64, User>, ChatError> {
        let users = self.user_repo.find_by_ids(&chat.participants).await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }

    /// Populate a chat with participant usernames and its last message.
    async fn populate(&self, chat: &Chat) -> Result<ChatDto, ChatError> {
        let users = self.participant_index(chat).await?;

        let last_message = match chat.last_message_id {
            Some(id) => self
                .message_repo
                .find_by_id(id)
                .await?
                .map(|m| message_dto(&m, &users)),
            None => None,
        };

        let participants = chat
            .participants
            .iter()
            .filter_map(|id| users.get(id))
            .map(|u| ParticipantDto {
                id: u.id.to_string(),
                username: u.username.clone(),
            })
            .collect();

        Ok(ChatDto {
            id: chat.id.to_string(),
            participants,
            is_group: chat.is_group,
            group_name: chat.group_name.clone(),
            group_admin: chat.group_admin_id.map(|id| id.to_string()),
            last_message,
            created_at: chat.created_at.to_rfc3339(),
        })
    }
}

fn message_dto(message: &Message, users: &HashMap<i64, User>) -> MessageDto {
    let sender = users
        .get(&message.sender_id)
        .map(|u| ParticipantDto {
            id: u.id.to_string(),
            username: u.username.clone(),
        })
        .unwrap_or_else(|| ParticipantDto {
            id: message.sender_id.to_string(),
            username: String::new(),
        });

    MessageDto {
        id: message.id.to_string(),
        chat_id: message.chat_id.to_string(),
        sender,
        content: message.content.clone(),
        is_read: message.is_read,
        media_url: message.media_url.clone(),
        timestamp: message.created_at.to_rfc3339(),
    }
}
