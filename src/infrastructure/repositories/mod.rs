//! Repository Implementations
//!
//! PostgreSQL-backed implementations of the domain repository traits.

mod chat_repository;
mod message_repository;
mod user_repository;

pub use chat_repository::PgChatRepository;
pub use message_repository::PgMessageRepository;
pub use user_repository::PgUserRepository;
