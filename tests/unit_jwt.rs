use std::sync::Arc;

use learnhub::learnhub_auth::{FixedClock, Role, TokenError, TokenKind, TokenService};
use learnhub::learnhub_config::JwtConfig;

const T0: i64 = 1_700_000_000;

fn service_at(now: i64) -> (TokenService, Arc<FixedClock>) {
    let config = JwtConfig::new("access-key-for-tests", "refresh-key-for-tests").unwrap();
    let clock = Arc::new(FixedClock::new(now));
    (TokenService::with_clock(&config, clock.clone()), clock)
}

#[test]
fn test_issue_pair_for_every_role() {
    let (tokens, _) = service_at(T0);

    for role in Role::ALL {
        let pair = tokens.issue_pair(42, role).unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);

        let access = tokens.verify_access(&pair.access_token).unwrap();
        assert_eq!(access.id, 42);
        assert_eq!(access.role, role);
        assert_eq!(access.token_type, TokenKind::Access);
        assert!(access.jti.is_none());

        let refresh = tokens.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.role, role);
        assert!(refresh.jti.is_some());
    }
}

#[test]
fn test_access_token_lifetime_is_fifteen_minutes() {
    let (tokens, clock) = service_at(T0);
    let token = tokens.issue_access_token(1, Role::User).unwrap();

    let claims = tokens.verify_access(&token).unwrap();
    assert_eq!(claims.exp - claims.iat, 15 * 60);

    clock.set(T0 + 15 * 60 - 1);
    assert!(tokens.verify_access(&token).is_ok());

    clock.set(T0 + 15 * 60);
    assert!(matches!(tokens.verify_access(&token), Err(TokenError::Expired)));
}

#[test]
fn test_refresh_token_outlives_access_token() {
    let (tokens, clock) = service_at(T0);
    let pair = tokens.issue_pair(7, Role::Ceo).unwrap();

    clock.advance(24 * 60 * 60);
    assert!(matches!(
        tokens.verify_access(&pair.access_token),
        Err(TokenError::Expired)
    ));
    assert!(tokens.verify_refresh(&pair.refresh_token).is_ok());

    clock.advance(7 * 24 * 60 * 60);
    assert!(matches!(
        tokens.verify_refresh(&pair.refresh_token),
        Err(TokenError::Expired)
    ));
}

#[test]
fn test_refresh_tokens_are_unique() {
    let (tokens, _) = service_at(T0);
    let a = tokens.issue_refresh_token(1, Role::User).unwrap();
    let b = tokens.issue_refresh_token(1, Role::User).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_tokens_do_not_cross_kinds() {
    let (tokens, _) = service_at(T0);
    let pair = tokens.issue_pair(3, Role::Admin).unwrap();

    assert!(matches!(
        tokens.verify_refresh(&pair.access_token),
        Err(TokenError::InvalidSignature)
    ));
    assert!(matches!(
        tokens.verify_access(&pair.refresh_token),
        Err(TokenError::InvalidSignature)
    ));
}

#[test]
fn test_token_from_other_deployment_is_rejected() {
    let (tokens, _) = service_at(T0);
    let other = TokenService::with_clock(
        &JwtConfig::new("another-access-key", "another-refresh-key").unwrap(),
        Arc::new(FixedClock::new(T0)),
    );

    let foreign = other.issue_access_token(1, Role::SuperAdmin).unwrap();
    assert!(matches!(
        tokens.verify_access(&foreign),
        Err(TokenError::InvalidSignature)
    ));
}

#[test]
fn test_garbage_is_invalid_not_expired() {
    let (tokens, _) = service_at(T0);
    for garbage in ["", "abc", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.e30.x"] {
        assert!(matches!(
            tokens.verify_access(garbage),
            Err(TokenError::InvalidSignature)
        ));
    }
}
