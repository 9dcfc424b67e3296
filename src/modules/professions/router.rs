use axum::{
    Router,
    routing::{get, patch, post},
};
use learnhub_auth::RoleSet;

use crate::middleware::role::Gated;
use crate::state::AppState;

use super::controller::{
    create_profession, delete_profession, get_profession, get_professions, update_profession,
};

pub fn init_professions_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_professions).merge(post(create_profession).gated(state, RoleSet::staff())),
        )
        .route(
            "/{id}",
            get(get_profession).merge(
                patch(update_profession)
                    .delete(delete_profession)
                    .gated(state, RoleSet::staff()),
            ),
        )
}
