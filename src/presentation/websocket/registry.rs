//! Room Registry
//!
//! Tracks live connections and their room memberships (one room per chat
//! thread) and fans accepted messages out to room members. Owned by the
//! realtime layer; constructed per application state so tests can build
//! and tear one down deterministically.

use std::collections::HashSet;

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::events::ServerEvent;

/// A live, authenticated connection.
pub struct ConnectionHandle {
    pub user_id: i64,
    pub username: String,
    pub sender: mpsc::UnboundedSender<ServerEvent>,
}

/// Registry mapping room ids (= chat ids) to the connections joined to
/// them. All mutation happens from connection tasks in this process; no
/// external mutation path exists.
#[derive(Default)]
pub struct RoomRegistry {
    /// Active connections by connection id
    connections: DashMap<Uuid, ConnectionHandle>,
    /// Room id to joined connection ids
    rooms: DashMap<i64, Vec<Uuid>>,
    /// Reverse index for cleanup on disconnect
    memberships: DashMap<Uuid, HashSet<i64>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly authenticated connection.
    pub fn register(&self, conn_id: Uuid, handle: ConnectionHandle) {
        tracing::info!(
            user_id = handle.user_id,
            conn_id = %conn_id,
            "Connection registered"
        );
        self.connections.insert(conn_id, handle);
    }

    /// Discard a connection and all its room memberships.
    pub fn unregister(&self, conn_id: Uuid) {
        if let Some((_, handle)) = self.connections.remove(&conn_id) {
            if let Some((_, rooms)) = self.memberships.remove(&conn_id) {
                for chat_id in rooms {
                    if let Some(mut members) = self.rooms.get_mut(&chat_id) {
                        members.retain(|c| c != &conn_id);
                    }
                }
            }

            tracing::info!(
                user_id = handle.user_id,
                conn_id = %conn_id,
                "Connection unregistered"
            );
        }
    }

    /// Join a connection to a chat room. Idempotent per (connection, room).
    pub fn join(&self, conn_id: Uuid, chat_id: i64) {
        let mut members = self.rooms.entry(chat_id).or_default();
        if !members.contains(&conn_id) {
            members.push(conn_id);
        }
        drop(members);

        self.memberships.entry(conn_id).or_default().insert(chat_id);
    }

    /// Send an event to every connection currently in the room. Delivery
    /// to a closed connection is silently skipped; its task is about to
    /// unregister it anyway.
    pub fn broadcast(&self, chat_id: i64, event: ServerEvent) {
        if let Some(members) = self.rooms.get(&chat_id) {
            for conn_id in members.iter() {
                if let Some(handle) = self.connections.get(conn_id) {
                    let _ = handle.sender.send(event.clone());
                }
            }
        }
    }

    /// Number of active connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of connections joined to a room.
    pub fn room_size(&self, chat_id: i64) -> usize {
        self.rooms.get(&chat_id).map(|m| m.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connect(
        registry: &RoomRegistry,
        user_id: i64,
        username: &str,
    ) -> (Uuid, mpsc::UnboundedReceiver<ServerEvent>) {
        let conn_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        registry.register(
            conn_id,
            ConnectionHandle {
                user_id,
                username: username.into(),
                sender: tx,
            },
        );
        (conn_id, rx)
    }

    fn message(n: u32) -> ServerEvent {
        ServerEvent::ReceiveMessage {
            chat_id: "1".into(),
            message_id: n.to_string(),
            sender: "alice".into(),
            content: format!("msg {n}"),
            timestamp: "2024-06-01T12:00:00+00:00".into(),
        }
    }

    #[tokio::test]
    async fn broadcast_reaches_room_members_in_order() {
        let registry = RoomRegistry::new();
        let (alice, mut alice_rx) = connect(&registry, 1, "alice");
        let (bob, mut bob_rx) = connect(&registry, 2, "bob");
        registry.join(alice, 1);
        registry.join(bob, 1);

        registry.broadcast(1, message(1));
        registry.broadcast(1, message(2));

        for rx in [&mut alice_rx, &mut bob_rx] {
            for expected in ["1", "2"] {
                let ServerEvent::ReceiveMessage { message_id, .. } = rx.recv().await.unwrap()
                else {
                    panic!("wrong event");
                };
                assert_eq!(message_id, expected);
            }
        }
    }

    #[tokio::test]
    async fn non_members_receive_nothing() {
        let registry = RoomRegistry::new();
        let (alice, _alice_rx) = connect(&registry, 1, "alice");
        let (_carol, mut carol_rx) = connect(&registry, 3, "carol");
        registry.join(alice, 1);

        registry.broadcast(1, message(1));
        assert!(carol_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unregister_cleans_rooms() {
        let registry = RoomRegistry::new();
        let (alice, _rx) = connect(&registry, 1, "alice");
        registry.join(alice, 1);
        registry.join(alice, 2);
        assert_eq!(registry.room_size(1), 1);

        registry.unregister(alice);
        assert_eq!(registry.connection_count(), 0);
        assert_eq!(registry.room_size(1), 0);
        assert_eq!(registry.room_size(2), 0);
    }

    #[tokio::test]
    async fn join_is_idempotent() {
        let registry = RoomRegistry::new();
        let (alice, mut rx) = connect(&registry, 1, "alice");
        registry.join(alice, 1);
        registry.join(alice, 1);
        assert_eq!(registry.room_size(1), 1);

        registry.broadcast(1, message(1));
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
