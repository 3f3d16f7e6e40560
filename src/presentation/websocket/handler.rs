//! Realtime Connection Handler
//!
//! Authenticates the websocket handshake through the session gate, then
//! runs one task per connection. Inbound events on a connection are
//! processed sequentially, so a single client's sends are persisted and
//! broadcast in invocation order; persistence always completes before the
//! matching broadcast.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::events::{ClientEvent, HandshakeQuery, ServerEvent};
use super::registry::{ConnectionHandle, RoomRegistry};
use crate::application::services::{ChatService, TokenPair};
use crate::domain::{ChatRepository, MessageRepository, User, UserRepository};
use crate::infrastructure::metrics;
use crate::infrastructure::repositories::{
    PgChatRepository, PgMessageRepository, PgUserRepository,
};
use crate::shared::error::AppError;
use crate::shared::validation::is_valid_message_content;
use crate::startup::AppState;

type DirectoryService = ChatService<PgUserRepository, PgChatRepository, PgMessageRepository>;

/// Websocket upgrade handler. The gate runs before the upgrade: a
/// rejected handshake is answered with the HTTP error and never becomes
/// an open socket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<HandshakeQuery>,
    State(state): State<AppState>,
) -> Response {
    let decision = match state
        .gate
        .authenticate(params.token.as_deref(), params.refresh_token.as_deref())
    {
        Ok(decision) => decision,
        Err(e) => return e.into_response(),
    };

    let auth = match decision {
        Ok(auth) => auth,
        Err(rejection) => {
            tracing::debug!(?rejection, "Handshake rejected");
            return AppError::from(rejection).into_response();
        }
    };

    // Bind the verified claim to an account before admitting the socket.
    let user_repo = PgUserRepository::new(state.db.clone());
    let user = match user_repo.find_by_username(&auth.username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::debug!(username = %auth.username, "Handshake claim has no account");
            return AppError::Unauthorized("Invalid token".into()).into_response();
        }
        Err(e) => return e.into_response(),
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, user, auth.rotated))
}

/// Run one authenticated connection to completion.
async fn handle_socket(
    socket: WebSocket,
    state: AppState,
    user: User,
    rotated: Option<TokenPair>,
) {
    let conn_id = Uuid::new_v4();
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Outgoing events funnel through a channel so broadcasts from other
    // connection tasks never touch the socket directly.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let sender_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    state.registry.register(
        conn_id,
        ConnectionHandle {
            user_id: user.id,
            username: user.username.clone(),
            sender: tx.clone(),
        },
    );
    metrics::REALTIME_CONNECTIONS_ACTIVE.inc();

    // Rotated credentials surface as the first event after admission.
    if let Some(pair) = rotated {
        let _ = tx.send(ServerEvent::TokenRotated {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        });
    }

    let directory = directory_service(&state);

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                handle_event(&text, conn_id, &user, &state.registry, &directory).await;
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(conn_id = %conn_id, "Connection closed by client");
                break;
            }
            Ok(Message::Ping(_)) => {
                // Pong is handled automatically by axum
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    state.registry.unregister(conn_id);
    metrics::REALTIME_CONNECTIONS_ACTIVE.dec();
    sender_task.abort();

    tracing::info!(user_id = user.id, conn_id = %conn_id, "User disconnected");
}

/// Handle a single inbound event. The realtime channel is fire-and-forget:
/// malformed or unauthorized events are logged and dropped, never answered.
async fn handle_event<U, C, M>(
    text: &str,
    conn_id: Uuid,
    user: &User,
    registry: &RoomRegistry,
    directory: &ChatService<U, C, M>,
) where
    U: UserRepository,
    C: ChatRepository,
    M: MessageRepository,
{
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(conn_id = %conn_id, error = %e, "Unparseable event");
            return;
        }
    };

    match event {
        ClientEvent::JoinChat { chat_id } => {
            let Ok(chat_id) = chat_id.parse::<i64>() else {
                tracing::debug!(conn_id = %conn_id, chat_id = %chat_id, "Malformed chat id in join");
                return;
            };
            registry.join(conn_id, chat_id);
            tracing::debug!(user_id = user.id, chat_id, "Joined chat room");
        }

        ClientEvent::SendMessage {
            chat_id,
            sender,
            content,
        } => {
            // Identity comes from the connection, never from the payload.
            if let Some(claimed) = sender {
                if claimed != user.username {
                    tracing::debug!(
                        user_id = user.id,
                        claimed = %claimed,
                        "Ignoring client-supplied sender"
                    );
                }
            }

            let Ok(chat_id) = chat_id.parse::<i64>() else {
                tracing::warn!(user_id = user.id, chat_id = %chat_id, "Malformed chat id in send");
                metrics::SENDS_REJECTED_TOTAL.inc();
                return;
            };

            if !is_valid_message_content(&content) {
                tracing::warn!(user_id = user.id, chat_id, "Rejected message content");
                metrics::SENDS_REJECTED_TOTAL.inc();
                return;
            }

            // Ordering point: the message is durable (and the chat's
            // last-message pointer advanced) before anyone hears it.
            match directory.append_message(chat_id, user, &content).await {
                Ok(message) => {
                    metrics::MESSAGES_ACCEPTED_TOTAL.inc();
                    registry.broadcast(
                        chat_id,
                        ServerEvent::ReceiveMessage {
                            chat_id: message.chat_id.to_string(),
                            message_id: message.id.to_string(),
                            sender: user.username.clone(),
                            content: message.content,
                            timestamp: message.created_at.to_rfc3339(),
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!(user_id = user.id, chat_id, error = %e, "Send rejected");
                    metrics::SENDS_REJECTED_TOTAL.inc();
                }
            }
        }
    }
}

fn directory_service(state: &AppState) -> DirectoryService {
    ChatService::new(
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(PgChatRepository::new(state.db.clone())),
        Arc::new(PgMessageRepository::new(state.db.clone())),
        state.snowflake.clone(),
    )
}
