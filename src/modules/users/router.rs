use axum::{
    Router,
    routing::{get, patch, post},
};
use learnhub_auth::{Role, RoleSet};

use crate::middleware::role::Gated;
use crate::state::AppState;

use super::controller::{
    change_my_password, delete_user, get_user, get_users, update_me, update_user,
    update_user_role,
};

pub fn init_users_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).gated(state, RoleSet::staff()))
        .route("/me", patch(update_me).gated(state, RoleSet::all()))
        .route(
            "/me/password",
            post(change_my_password).gated(state, RoleSet::all()),
        )
        .route(
            "/{id}",
            get(get_user)
                .patch(update_user)
                .delete(delete_user)
                .gated(state, RoleSet::staff()),
        )
        .route(
            "/{id}/role",
            patch(update_user_role).gated(state, RoleSet::of([Role::SuperAdmin])),
        )
}
