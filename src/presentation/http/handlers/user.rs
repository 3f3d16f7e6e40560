//! User Directory Handlers

use axum::{extract::State, Json};

use crate::application::dto::response::{UserListResponse, UserSummary};
use crate::domain::UserRepository;
use crate::infrastructure::repositories::PgUserRepository;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<UserListResponse>, AppError> {
    let users = PgUserRepository::new(state.db.clone())
        .list_all()
        .await?
        .into_iter()
        .map(UserSummary::from)
        .collect();

    Ok(Json(UserListResponse { users }))
}
