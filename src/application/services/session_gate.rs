//! Session Gate
//!
//! Authenticates an inbound unit of work (HTTP request or websocket
//! handshake) from an optional access token and an optional refresh token,
//! transparently rotating an expired access token when a valid refresh
//! token is presented.

use crate::application::services::token_service::{TokenPair, TokenService};
use crate::shared::error::AppError;

/// Why the gate refused to authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    /// Neither token was presented.
    MissingCredentials,
    /// Access token invalid and no refresh token to fall back on. The
    /// client may still hold a valid refresh token elsewhere, so no
    /// logout is forced.
    InvalidCredentials,
    /// Refresh token presented but rejected: the client must clear all
    /// stored credentials and re-authenticate interactively.
    RefreshRejected,
}

impl GateRejection {
    /// Whether the client must drop its stored credentials.
    pub fn forces_logout(&self) -> bool {
        matches!(self, GateRejection::RefreshRejected)
    }
}

impl From<GateRejection> for AppError {
    fn from(rejection: GateRejection) -> Self {
        match rejection {
            GateRejection::MissingCredentials => {
                AppError::Unauthorized("Missing credentials".into())
            }
            GateRejection::InvalidCredentials => AppError::Unauthorized("Invalid token".into()),
            GateRejection::RefreshRejected => {
                AppError::SessionExpired("Refresh token rejected".into())
            }
        }
    }
}

/// Gate outcome on success: a verified identity plus, on the refresh path
/// only, a freshly minted token pair the caller must surface to the client.
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// Username from the verified claim.
    pub username: String,
    /// Present iff authentication went through the refresh path.
    pub rotated: Option<TokenPair>,
}

/// Stateless authentication gate over the token service.
#[derive(Clone)]
pub struct SessionGate {
    tokens: TokenService,
}

impl SessionGate {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }

    pub fn token_service(&self) -> &TokenService {
        &self.tokens
    }

    /// Run the gate state machine.
    ///
    /// - valid access token: authenticated, no rotation
    /// - invalid/missing access + valid refresh: authenticated with a
    ///   fresh pair attached
    /// - invalid/missing access + invalid refresh: rejected, logout forced
    /// - invalid access, no refresh: rejected
    /// - nothing presented: rejected as missing
    ///
    /// The outer `Result` carries only internal faults (token minting);
    /// ordinary authentication failures are the inner `GateRejection`.
    pub fn authenticate(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<Result<Authenticated, GateRejection>, AppError> {
        if access_token.is_none() && refresh_token.is_none() {
            return Ok(Err(GateRejection::MissingCredentials));
        }

        if let Some(claims) = access_token.and_then(|t| self.tokens.verify_access(t)) {
            return Ok(Ok(Authenticated {
                username: claims.sub,
                rotated: None,
            }));
        }

        // Access token missing or invalid; fall back to the refresh token.
        if let Some(refresh) = refresh_token {
            return match self.tokens.verify_refresh(refresh) {
                Some(claims) => {
                    let pair = self
                        .tokens
                        .issue_pair(&claims.sub)
                        .map_err(|e| AppError::Internal(e.to_string()))?;
                    tracing::debug!(username = %claims.sub, "Access token rotated via refresh token");
                    Ok(Ok(Authenticated {
                        username: claims.sub,
                        rotated: Some(pair),
                    }))
                }
                None => Ok(Err(GateRejection::RefreshRejected)),
            };
        }

        Ok(Err(GateRejection::InvalidCredentials))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::token_service::TokenService;
    use crate::config::JwtSettings;

    fn settings() -> JwtSettings {
        JwtSettings {
            access_secret: "access-secret-0123456789-0123456789-01".into(),
            refresh_secret: "refresh-secret-0123456789-0123456789-0".into(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        }
    }

    fn gate() -> SessionGate {
        SessionGate::new(TokenService::new(settings()))
    }

    fn expired_access_gate() -> SessionGate {
        let mut s = settings();
        s.access_token_expiry_minutes = -5;
        SessionGate::new(TokenService::new(s))
    }

    #[test]
    fn no_tokens_is_missing_credentials() {
        let rejection = gate().authenticate(None, None).unwrap().unwrap_err();
        assert_eq!(rejection, GateRejection::MissingCredentials);
        assert!(!rejection.forces_logout());
    }

    #[test]
    fn valid_access_token_authenticates_without_rotation() {
        let gate = gate();
        let access = gate.tokens.issue_access_token("alice").unwrap();
        let auth = gate
            .authenticate(Some(&access), None)
            .unwrap()
            .expect("authenticated");
        assert_eq!(auth.username, "alice");
        assert!(auth.rotated.is_none());
    }

    #[test]
    fn valid_access_with_refresh_present_still_does_not_rotate() {
        let gate = gate();
        let access = gate.tokens.issue_access_token("alice").unwrap();
        let refresh = gate.tokens.issue_refresh_token("alice").unwrap();
        let auth = gate
            .authenticate(Some(&access), Some(&refresh))
            .unwrap()
            .expect("authenticated");
        assert!(auth.rotated.is_none());
    }

    #[test]
    fn expired_access_with_valid_refresh_rotates() {
        // Mint an already expired access token, verify against a gate with
        // the normal expiry settings.
        let expired = expired_access_gate()
            .tokens
            .issue_access_token("alice")
            .unwrap();
        let gate = gate();
        let refresh = gate.tokens.issue_refresh_token("alice").unwrap();

        let auth = gate
            .authenticate(Some(&expired), Some(&refresh))
            .unwrap()
            .expect("authenticated via refresh");
        assert_eq!(auth.username, "alice");
        let pair = auth.rotated.expect("fresh pair issued");

        // The fresh access token must verify and expire in the future,
        // strictly later than the expired one it replaces.
        let new_claims = gate.tokens.verify_access(&pair.access_token).unwrap();
        assert!(new_claims.exp > chrono::Utc::now().timestamp());
        assert!(gate.tokens.verify_refresh(&pair.refresh_token).is_some());
    }

    #[test]
    fn expired_access_with_invalid_refresh_forces_logout() {
        let expired = expired_access_gate()
            .tokens
            .issue_access_token("alice")
            .unwrap();
        let rejection = gate()
            .authenticate(Some(&expired), Some("garbage"))
            .unwrap()
            .unwrap_err();
        assert_eq!(rejection, GateRejection::RefreshRejected);
        assert!(rejection.forces_logout());
    }

    #[test]
    fn invalid_access_without_refresh_is_plain_invalid() {
        let rejection = gate()
            .authenticate(Some("garbage"), None)
            .unwrap()
            .unwrap_err();
        assert_eq!(rejection, GateRejection::InvalidCredentials);
        assert!(!rejection.forces_logout());
    }

    #[test]
    fn missing_access_with_valid_refresh_rotates() {
        let gate = gate();
        let refresh = gate.tokens.issue_refresh_token("bob").unwrap();
        let auth = gate
            .authenticate(None, Some(&refresh))
            .unwrap()
            .expect("authenticated");
        assert_eq!(auth.username, "bob");
        assert!(auth.rotated.is_some());
    }
}
