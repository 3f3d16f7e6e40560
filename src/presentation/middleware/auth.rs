//! Authentication Middleware
//!
//! Runs the session gate over the Authorization and x-refresh-token
//! headers for protected routes. When the refresh path fires, the rotated
//! pair is attached to the response as x-access-token / x-refresh-token
//! so the client can swap its credentials proactively.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::shared::error::AppError;
use crate::startup::AppState;

pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

/// Authenticated identity attached to the request, always derived from a
/// verified claim.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Authentication middleware for protected routes.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let access = bearer_token(request.headers());
    let refresh = request
        .headers()
        .get(REFRESH_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let auth = state
        .gate
        .authenticate(access.as_deref(), refresh.as_deref())?
        .map_err(AppError::from)?;

    request.extensions_mut().insert(AuthUser {
        username: auth.username,
    });

    let mut response = next.run(request).await;

    if let Some(pair) = auth.rotated {
        attach_rotated_tokens(response.headers_mut(), &pair.access_token, &pair.refresh_token);
    }

    Ok(response)
}

/// Extract the bearer token from the Authorization header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned)
}

fn attach_rotated_tokens(headers: &mut HeaderMap, access: &str, refresh: &str) {
    for (name, value) in [
        (ACCESS_TOKEN_HEADER, access),
        (REFRESH_TOKEN_HEADER, refresh),
    ] {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                headers.insert(HeaderName::from_static(name), value);
            }
            Err(e) => tracing::error!("Rotated token not header-safe: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert!(bearer_token(&headers).is_none());
    }
}
