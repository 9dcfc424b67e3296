//! Token payloads and the authenticated principal.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::roles::Role;

/// Which of the two signing keys a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by both access and refresh tokens.
///
/// `token_type` must match the kind being verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub id: i64,
    pub role: Role,
    pub token_type: TokenKind,
    /// Issued-at (Unix seconds).
    pub iat: i64,
    /// Expiration (Unix seconds).
    pub exp: i64,
    /// Unique id, present on refresh tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            role: self.role,
        }
    }
}

/// The verified caller attached to a request after the role gate admits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    pub id: i64,
    pub role: Role,
}

impl Principal {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_wire_format() {
        let claims = Claims {
            id: 7,
            role: Role::Admin,
            token_type: TokenKind::Access,
            iat: 1_700_000_000,
            exp: 1_700_000_900,
            jti: None,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["role"], "ADMIN");
        assert_eq!(json["token_type"], "access");
        assert!(json.get("jti").is_none());
    }

    #[test]
    fn test_principal_from_claims() {
        let claims = Claims {
            id: 9,
            role: Role::User,
            token_type: TokenKind::Refresh,
            iat: 0,
            exp: 1,
            jti: Some("abc".to_string()),
        };
        assert_eq!(
            claims.principal(),
            Principal {
                id: 9,
                role: Role::User
            }
        );
        assert!(!claims.principal().is_staff());
    }
}
