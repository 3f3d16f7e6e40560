//! Route Configuration

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::handlers::{auth, chat, health, user};
use crate::presentation::middleware::auth::auth_middleware;
use crate::presentation::middleware::cors::create_cors_layer;
use crate::presentation::middleware::logging::create_trace_layer;
use crate::presentation::websocket::ws_handler;
use crate::startup::AppState;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/chats", get(chat::list_chats).post(chat::create_private_chat))
        .route("/chats/group", post(chat::create_group_chat))
        .route("/chats/{chat_id}", get(chat::get_chat))
        .route("/users", get(user::list_users))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/auth/check", post(auth::auth_check))
        .route("/health", get(health::health))
        .route("/metrics", get(health::metrics_handler))
        .route("/ws", get(ws_handler));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(create_trace_layer())
        .layer(create_cors_layer(&state.settings.cors))
        .with_state(state)
}
