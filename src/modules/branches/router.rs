use axum::{
    Router,
    routing::{get, patch, post},
};
use learnhub_auth::RoleSet;

use crate::middleware::role::Gated;
use crate::state::AppState;

use super::controller::{create_branch, delete_branch, get_branch, get_branches, update_branch};

pub fn init_branches_router(state: &AppState) -> Router<AppState> {
    let managers = RoleSet::center_managers();

    Router::new()
        .route(
            "/",
            get(get_branches).merge(post(create_branch).gated(state, managers)),
        )
        .route(
            "/{id}",
            get(get_branch).merge(
                patch(update_branch)
                    .delete(delete_branch)
                    .gated(state, managers),
            ),
        )
}
