use axum::{
    Router,
    routing::{get, post},
};
use learnhub_auth::RoleSet;

use crate::middleware::role::Gated;
use crate::state::AppState;

use super::controller::{get_me, login_user, refresh_tokens, register_user};

pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/refresh", post(refresh_tokens))
        .route("/me", get(get_me).gated(state, RoleSet::all()))
}
