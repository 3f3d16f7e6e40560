//! Realtime Layer
//!
//! Websocket connection lifecycle, room membership and
//! persist-then-broadcast message delivery.

pub mod events;
pub mod handler;
pub mod registry;

pub use events::{ClientEvent, ServerEvent};
pub use handler::ws_handler;
pub use registry::{ConnectionHandle, RoomRegistry};
