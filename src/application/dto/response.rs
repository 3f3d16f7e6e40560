//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;

use crate::application::services::{ChatDto, MessageDto, TokenPair};
use crate::domain::User;

/// Token pair response for login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// Registration response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Auth check response, carrying the tokens the client should keep using:
/// a fresh pair on the refresh path, otherwise only what was presented.
/// An absent refresh token is omitted, never echoed as an empty string,
/// so a client storing the response wholesale cannot clobber a refresh
/// token it holds elsewhere.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCheckResponse {
    pub authenticated: bool,
    pub user_id: String,
    pub username: String,
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Chat list response
#[derive(Debug, Serialize)]
pub struct ChatListResponse {
    pub chats: Vec<ChatDto>,
}

/// Single chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub chat: ChatDto,
}

/// Chat with history response
#[derive(Debug, Serialize)]
pub struct ChatWithMessagesResponse {
    pub chat: ChatDto,
    pub messages: Vec<MessageDto>,
}

/// Directory entry in the user listing
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
        }
    }
}

/// User list response
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_check_omits_absent_refresh_token() {
        let response = AuthCheckResponse {
            authenticated: true,
            user_id: "1".into(),
            username: "alice".into(),
            access_token: "access".into(),
            refresh_token: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("refreshToken").is_none());
        assert_eq!(json["accessToken"], "access");
    }

    #[test]
    fn auth_check_includes_refresh_token_when_present() {
        let response = AuthCheckResponse {
            authenticated: true,
            user_id: "1".into(),
            username: "alice".into(),
            access_token: "access".into(),
            refresh_token: Some("refresh".into()),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["refreshToken"], "refresh");
    }
}
