//! Presentation Layer
//!
//! HTTP routes and handlers, middleware, and the websocket realtime layer.

pub mod http;
pub mod middleware;
pub mod websocket;
