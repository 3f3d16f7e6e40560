//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **TokenService**: issues and verifies access/refresh JWTs
//! - **SessionGate**: authenticates requests and connections, rotating
//!   expired access tokens through valid refresh tokens
//! - **AuthService**: registration and credential login
//! - **ChatService**: chat directory, membership authorization, message
//!   recording

pub mod auth_service;
pub mod chat_service;
pub mod session_gate;
pub mod token_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth_service::{AuthError, AuthService};
pub use chat_service::{ChatCreation, ChatDto, ChatError, ChatService, MessageDto, ParticipantDto};
pub use session_gate::{Authenticated, GateRejection, SessionGate};
pub use token_service::{Claims, TokenIssueError, TokenPair, TokenService};
