use axum::{extract::FromRequestParts, http::request::Parts};
use learnhub_auth::{Principal, Role};
use learnhub_core::AppError;

/// The caller admitted by the role gate.
///
/// Only available on gated routes; elsewhere extraction fails with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn is_staff(&self) -> bool {
        self.0.is_staff()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized("Missing bearer token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    #[tokio::test]
    async fn test_reads_principal_from_extensions() {
        let mut req = Request::builder().body(()).unwrap();
        req.extensions_mut().insert(Principal {
            id: 7,
            role: Role::Admin,
        });
        let (mut parts, _) = req.into_parts();

        let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.id(), 7);
        assert_eq!(user.role(), Role::Admin);
        assert!(user.is_staff());
    }

    #[tokio::test]
    async fn test_ungated_request_is_unauthorized() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let err = AuthUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
}
