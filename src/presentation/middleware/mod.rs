//! Middleware
//!
//! Tower middleware for request processing.

pub mod auth;
pub mod cors;
pub mod logging;

pub use auth::{auth_middleware, bearer_token, AuthUser, ACCESS_TOKEN_HEADER, REFRESH_TOKEN_HEADER};
