//! Role gate middleware.
//!
//! Each gated route carries its own [`RoleGate`] as middleware state, so the
//! allow-list is fixed when the router is built. Admitted requests get the
//! [`learnhub_auth::Principal`] inserted into their extensions; rejected ones
//! are answered with 401 or 403 before reaching the handler.

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use learnhub_auth::{RoleGate, RoleSet};

use crate::metrics::track_authorization_check;
use crate::state::AppState;

pub async fn role_gate(State(gate): State<RoleGate>, mut req: Request, next: Next) -> Response {
    match gate.authorize(req.headers()) {
        Ok(principal) => {
            track_authorization_check("admitted");
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(err) => {
            track_authorization_check(err.outcome());
            err.into_response()
        }
    }
}

/// Attaches a role gate to a router or a single method router.
///
/// # Panics
///
/// Panics on an empty [`RoleSet`].
pub trait Gated: Sized {
    fn gated(self, state: &AppState, allowed: RoleSet) -> Self;
}

impl Gated for Router<AppState> {
    fn gated(self, state: &AppState, allowed: RoleSet) -> Self {
        let gate = RoleGate::new(state.tokens.clone(), allowed);
        self.route_layer(middleware::from_fn_with_state(gate, role_gate))
    }
}

impl Gated for MethodRouter<AppState> {
    fn gated(self, state: &AppState, allowed: RoleSet) -> Self {
        let gate = RoleGate::new(state.tokens.clone(), allowed);
        self.route_layer(middleware::from_fn_with_state(gate, role_gate))
    }
}
