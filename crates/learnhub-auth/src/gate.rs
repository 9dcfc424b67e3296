//! The role gate: bearer extraction, verification, and allow-list check.
//!
//! [`RoleGate::authorize`] is synchronous and touches no storage. The axum
//! middleware that wraps it lives in the application crate.
//!
//! ```text
//! Unauthenticated -> CredentialExtracted -> Verified -> Admitted
//!        |                   |                  |
//!  MissingCredential   InvalidCredential    Forbidden
//! ```

use std::sync::Arc;

use axum::{
    Json,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::claims::Principal;
use crate::jwt::TokenService;
use crate::roles::RoleSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Missing bearer token")]
    MissingCredential,
    #[error("Invalid or expired token")]
    InvalidCredential,
    #[error("Insufficient role for this resource")]
    Forbidden,
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::MissingCredential | GateError::InvalidCredential => {
                StatusCode::UNAUTHORIZED
            }
            GateError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    /// Short label used as a metric/log outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            GateError::MissingCredential => "missing_credential",
            GateError::InvalidCredential => "invalid_credential",
            GateError::Forbidden => "forbidden",
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Returns the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively. A missing header, a value that
/// is not visible ASCII, another scheme, or an empty token all yield `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[derive(Clone)]
pub struct RoleGate {
    tokens: Arc<TokenService>,
    allowed: RoleSet,
}

impl RoleGate {
    /// # Panics
    ///
    /// Panics if `allowed` is empty. Gates are built while the router is
    /// assembled, so this fails at startup.
    pub fn new(tokens: Arc<TokenService>, allowed: RoleSet) -> Self {
        assert!(
            !allowed.is_empty(),
            "role gate requires at least one allowed role"
        );
        Self { tokens, allowed }
    }

    pub fn allowed(&self) -> RoleSet {
        self.allowed
    }

    pub fn authorize(&self, headers: &HeaderMap) -> Result<Principal, GateError> {
        let token = bearer_token(headers).ok_or(GateError::MissingCredential)?;

        let claims = self.tokens.verify_access(token).map_err(|err| {
            tracing::debug!(error = %err, "Access token rejected");
            GateError::InvalidCredential
        })?;

        if !self.allowed.contains(claims.role) {
            tracing::debug!(
                user.id = claims.id,
                user.role = %claims.role,
                allowed = ?self.allowed,
                "Role not permitted"
            );
            return Err(GateError::Forbidden);
        }

        Ok(claims.principal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::FixedClock;
    use crate::roles::Role;
    use axum::http::HeaderValue;
    use http_body_util::BodyExt;
    use learnhub_config::JwtConfig;

    const NOW: i64 = 1_700_000_000;

    fn tokens() -> (Arc<TokenService>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(NOW));
        let config = JwtConfig::new("gate-access-secret", "gate-refresh-secret").unwrap();
        (
            Arc::new(TokenService::with_clock(&config, clock.clone())),
            clock,
        )
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_admits_admin_into_staff_gate() {
        let (tokens, _) = tokens();
        let token = tokens.issue_access_token(7, Role::Admin).unwrap();
        let gate = RoleGate::new(tokens, RoleSet::staff());

        let principal = gate.authorize(&bearer(&token)).unwrap();
        assert_eq!(principal.id, 7);
        assert_eq!(principal.role, Role::Admin);
    }

    #[test]
    fn test_rejects_user_from_admin_gate() {
        let (tokens, _) = tokens();
        let token = tokens.issue_access_token(9, Role::User).unwrap();
        let gate = RoleGate::new(tokens, RoleSet::of([Role::Admin]));

        assert_eq!(
            gate.authorize(&bearer(&token)).unwrap_err(),
            GateError::Forbidden
        );
    }

    #[test]
    fn test_missing_header() {
        let (tokens, _) = tokens();
        let gate = RoleGate::new(tokens, RoleSet::all());
        assert_eq!(
            gate.authorize(&HeaderMap::new()).unwrap_err(),
            GateError::MissingCredential
        );
    }

    #[test]
    fn test_expired_token_is_invalid_not_forbidden() {
        let (tokens, clock) = tokens();
        let token = tokens.issue_access_token(9, Role::User).unwrap();
        let gate = RoleGate::new(tokens, RoleSet::of([Role::Admin]));

        clock.advance(901);
        assert_eq!(
            gate.authorize(&bearer(&token)).unwrap_err(),
            GateError::InvalidCredential
        );
    }

    #[test]
    fn test_refresh_token_is_not_a_credential() {
        let (tokens, _) = tokens();
        let token = tokens.issue_refresh_token(1, Role::Admin).unwrap();
        let gate = RoleGate::new(tokens, RoleSet::all());
        assert_eq!(
            gate.authorize(&bearer(&token)).unwrap_err(),
            GateError::InvalidCredential
        );
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer    "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    #[should_panic(expected = "at least one allowed role")]
    fn test_empty_allow_list_panics() {
        let (tokens, _) = tokens();
        RoleGate::new(tokens, RoleSet::empty());
    }

    #[tokio::test]
    async fn test_error_response_shape() {
        let response = GateError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Insufficient role for this resource");

        assert_eq!(
            GateError::MissingCredential.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
