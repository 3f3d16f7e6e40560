//! Realtime Wire Events
//!
//! JSON text frames of the shape `{"event": ..., "data": ...}`. IDs travel
//! as strings for JavaScript clients.

use serde::{Deserialize, Serialize};

/// Events the client sends to the server.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Join the room for a chat thread. Advisory: joining scopes delivery
    /// only, it grants no read access and replays no history.
    #[serde(rename_all = "camelCase")]
    JoinChat { chat_id: String },

    /// Send a message into a chat. The `sender` field is accepted for
    /// wire compatibility but ignored; identity comes from the
    /// authenticated connection.
    #[serde(rename_all = "camelCase")]
    SendMessage {
        chat_id: String,
        #[serde(default)]
        sender: Option<String>,
        content: String,
    },
}

/// Events the server pushes to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A message accepted into a chat the connection has joined.
    #[serde(rename_all = "camelCase")]
    ReceiveMessage {
        chat_id: String,
        message_id: String,
        sender: String,
        content: String,
        timestamp: String,
    },

    /// Fresh token pair, sent once right after a handshake that
    /// authenticated through the refresh token.
    #[serde(rename_all = "camelCase")]
    TokenRotated {
        access_token: String,
        refresh_token: String,
    },
}

/// Connection-handshake query parameters carrying the credentials.
#[derive(Debug, Deserialize)]
pub struct HandshakeQuery {
    pub token: Option<String>,
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn join_chat_deserializes() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"joinChat","data":{"chatId":"42"}}"#).unwrap();
        let ClientEvent::JoinChat { chat_id } = event else {
            panic!("wrong event");
        };
        assert_eq!(chat_id, "42");
    }

    #[test]
    fn send_message_deserializes_with_and_without_sender() {
        let with: ClientEvent = serde_json::from_str(
            r#"{"event":"sendMessage","data":{"chatId":"42","sender":"mallory","content":"hi"}}"#,
        )
        .unwrap();
        let ClientEvent::SendMessage { sender, content, .. } = with else {
            panic!("wrong event");
        };
        assert_eq!(sender.as_deref(), Some("mallory"));
        assert_eq!(content, "hi");

        let without: ClientEvent = serde_json::from_str(
            r#"{"event":"sendMessage","data":{"chatId":"42","content":"hi"}}"#,
        )
        .unwrap();
        let ClientEvent::SendMessage { sender, .. } = without else {
            panic!("wrong event");
        };
        assert!(sender.is_none());
    }

    #[test]
    fn receive_message_serializes_camel_case() {
        let event = ServerEvent::ReceiveMessage {
            chat_id: "42".into(),
            message_id: "7".into(),
            sender: "alice".into(),
            content: "hi".into(),
            timestamp: "2024-06-01T12:00:00+00:00".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "receiveMessage");
        assert_eq!(json["data"]["chatId"], "42");
        assert_eq!(json["data"]["messageId"], "7");
        assert_eq!(json["data"]["sender"], "alice");
    }
}
