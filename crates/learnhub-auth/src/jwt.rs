//! Token issuance and verification.
//!
//! [`TokenService`] owns the encoding/decoding keys built from
//! [`JwtConfig`] and a [`Clock`]. Access and refresh tokens use separate
//! HS256 keys. Expiry is checked against the injected clock rather than by
//! `jsonwebtoken`, so tests can move time forward without sleeping.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use learnhub_config::JwtConfig;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::claims::{Claims, TokenKind};
use crate::roles::Role;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed, forged, signed with the other key, or of the wrong kind.
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("token lifetime of {0}s overflows the expiry timestamp")]
    ExpiryOverflow(i64),
    #[error("failed to encode token: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}

/// Source of the current Unix time in seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A manually driven clock.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicI64);

impl FixedClock {
    pub fn new(now: i64) -> Self {
        Self(AtomicI64::new(now))
    }

    pub fn set(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: i64) {
        self.0.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Access and refresh tokens returned by login and refresh.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `"Bearer"`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

pub struct TokenService {
    access: KeyPair,
    refresh: KeyPair,
    access_ttl: i64,
    refresh_ttl: i64,
    clock: Arc<dyn Clock>,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            access: KeyPair::from_secret(&config.access_secret),
            refresh: KeyPair::from_secret(&config.refresh_secret),
            access_ttl: config.access_token_expiry,
            refresh_ttl: config.refresh_token_expiry,
            clock,
            validation,
        }
    }

    pub fn access_token_ttl(&self) -> i64 {
        self.access_ttl
    }

    pub fn issue_access_token(&self, id: i64, role: Role) -> Result<String, TokenError> {
        self.issue(id, role, TokenKind::Access)
    }

    pub fn issue_refresh_token(&self, id: i64, role: Role) -> Result<String, TokenError> {
        self.issue(id, role, TokenKind::Refresh)
    }

    pub fn issue_pair(&self, id: i64, role: Role) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(id, role)?,
            refresh_token: self.issue_refresh_token(id, role)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl,
        })
    }

    fn issue(&self, id: i64, role: Role, kind: TokenKind) -> Result<String, TokenError> {
        let now = self.clock.now();
        let (keys, ttl, jti) = match kind {
            TokenKind::Access => (&self.access, self.access_ttl, None),
            TokenKind::Refresh => (
                &self.refresh,
                self.refresh_ttl,
                Some(Uuid::new_v4().to_string()),
            ),
        };

        let exp = now.checked_add(ttl).ok_or(TokenError::ExpiryOverflow(ttl))?;

        let claims = Claims {
            id,
            role,
            token_type: kind,
            iat: now,
            exp,
            jti,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(TokenError::Encoding)
    }

    /// Verifies `token` against the key for `kind` and the current clock.
    ///
    /// A token is expired once `now >= exp`.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let keys = match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        };

        let claims = decode::<Claims>(token, &keys.decoding, &self.validation)
            .map_err(|_| TokenError::InvalidSignature)?
            .claims;

        if claims.token_type != kind {
            return Err(TokenError::InvalidSignature);
        }
        if self.clock.now() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenKind::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenKind::Refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn test_config() -> JwtConfig {
        JwtConfig::new("test-access-secret", "test-refresh-secret").unwrap()
    }

    fn service_at(now: i64) -> (TokenService, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(now));
        (TokenService::with_clock(&test_config(), clock.clone()), clock)
    }

    #[test]
    fn test_access_token_round_trip() {
        let (service, _) = service_at(NOW);
        let token = service.issue_access_token(42, Role::Ceo).unwrap();
        let claims = service.verify_access(&token).unwrap();

        assert_eq!(claims.id, 42);
        assert_eq!(claims.role, Role::Ceo);
        assert_eq!(claims.iat, NOW);
        assert_eq!(claims.exp, NOW + 900);
        assert!(claims.jti.is_none());
    }

    #[test]
    fn test_refresh_token_has_jti_and_week_expiry() {
        let (service, _) = service_at(NOW);
        let token = service.issue_refresh_token(5, Role::User).unwrap();
        let claims = service.verify_refresh(&token).unwrap();

        assert_eq!(claims.exp, NOW + 604800);
        assert!(claims.jti.is_some());
    }

    #[test]
    fn test_oversized_lifetime_is_an_error() {
        let mut config = test_config();
        config.refresh_token_expiry = i64::MAX;
        let service = TokenService::with_clock(&config, Arc::new(FixedClock::new(NOW)));

        assert!(service.issue_access_token(1, Role::User).is_ok());
        assert!(matches!(
            service.issue_refresh_token(1, Role::User),
            Err(TokenError::ExpiryOverflow(i64::MAX))
        ));
        assert!(service.issue_pair(1, Role::User).is_err());
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let (service, _) = service_at(NOW);
        let a = service.issue_refresh_token(5, Role::User).unwrap();
        let b = service.issue_refresh_token(5, Role::User).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_access_token_expires_after_window() {
        let (service, clock) = service_at(NOW);
        let token = service.issue_access_token(1, Role::User).unwrap();

        clock.advance(899);
        assert!(service.verify_access(&token).is_ok());

        clock.advance(1);
        assert!(matches!(
            service.verify_access(&token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_foreign_key_is_invalid_signature() {
        let (service, _) = service_at(NOW);
        let other_config = JwtConfig::new("another-access", "another-refresh").unwrap();
        let other = TokenService::with_clock(&other_config, Arc::new(FixedClock::new(NOW)));

        let token = other.issue_access_token(1, Role::Admin).unwrap();
        assert!(matches!(
            service.verify_access(&token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        let (service, _) = service_at(NOW);
        let access = service.issue_access_token(1, Role::Admin).unwrap();
        let refresh = service.issue_refresh_token(1, Role::Admin).unwrap();

        assert!(matches!(
            service.verify_refresh(&access),
            Err(TokenError::InvalidSignature)
        ));
        assert!(matches!(
            service.verify_access(&refresh),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_garbage_is_invalid_signature() {
        let (service, _) = service_at(NOW);
        for token in ["", "abc", "a.b.c"] {
            assert!(matches!(
                service.verify_access(token),
                Err(TokenError::InvalidSignature)
            ));
        }
    }

    #[test]
    fn test_issue_pair() {
        let (service, _) = service_at(NOW);
        let pair = service.issue_pair(3, Role::SuperAdmin).unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);
        assert_eq!(service.verify_access(&pair.access_token).unwrap().id, 3);
        assert_eq!(service.verify_refresh(&pair.refresh_token).unwrap().id, 3);
    }
}
