//! # Domain Entities
//!
//! Core domain entities for the messenger.
//!
//! - **User**: account with credential hash
//! - **Chat**: a private or group thread with participants and a
//!   last-message pointer
//! - **Message**: a single immutable message owned by its chat
//!
//! Each entity has an associated repository trait defining data access
//! operations; the traits are implemented in the infrastructure layer.

mod chat;
mod message;
mod user;

pub use chat::{Chat, ChatRepository};
pub use message::{Message, MessageRepository};
pub use user::{User, UserRepository};
