//! Authentication Handlers

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{AuthCheckRequest, LoginRequest, RegisterRequest};
use crate::application::dto::response::{AuthCheckResponse, RegisterResponse, TokenResponse};
use crate::presentation::middleware::bearer_token;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate().map_err(validation_error)?;

    let (user, pair) = state
        .auth_service()
        .register(&req.username, &req.password)
        .await
        .map_err(AppError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            username: user.username,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }),
    ))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let pair = state
        .auth_service()
        .login(&req.username, &req.password)
        .await
        .map_err(AppError::from)?;

    Ok(Json(TokenResponse::from(pair)))
}

/// POST /auth/check
///
/// The access token travels in the Authorization header, the refresh token
/// in the body. The response always carries the pair the client should keep
/// using: freshly minted on the refresh path, the presented pair otherwise.
pub async fn auth_check(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<AuthCheckRequest>>,
) -> Result<Json<AuthCheckResponse>, AppError> {
    let access = bearer_token(&headers);
    let refresh = body.and_then(|Json(b)| b.refresh_token);

    let auth = state
        .gate
        .authenticate(access.as_deref(), refresh.as_deref())?
        .map_err(AppError::from)?;

    let user = state
        .chat_service()
        .resolve_user(&auth.username)
        .await
        .map_err(AppError::from)?;

    let (access_token, refresh_token) = match auth.rotated {
        Some(pair) => (pair.access_token, Some(pair.refresh_token)),
        None => (access.unwrap_or_default(), refresh),
    };

    Ok(Json(AuthCheckResponse {
        authenticated: true,
        user_id: user.id.to_string(),
        username: user.username,
        access_token,
        refresh_token,
    }))
}
