//! Request DTOs
//!
//! Data structures for API request bodies. Field names are camelCase on
//! the wire to match the JavaScript client.

use serde::Deserialize;
use validator::Validate;

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Auth check request; the access token travels in the Authorization
/// header, the refresh token in the body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCheckRequest {
    pub refresh_token: Option<String>,
}

/// Private chat creation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrivateChatRequest {
    /// The other participant's user id (stringified snowflake)
    pub participant_id: String,
}

/// Group chat creation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupChatRequest {
    /// Participant user ids (stringified snowflakes), creator excluded or
    /// included; the union with the creator is used either way
    pub participant_ids: Vec<String>,

    #[validate(length(min = 1, max = 100, message = "Group name must be 1-100 characters"))]
    pub group_name: String,
}
