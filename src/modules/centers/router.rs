use axum::{
    Router,
    routing::{get, patch, post},
};
use learnhub_auth::RoleSet;

use crate::middleware::role::Gated;
use crate::state::AppState;

use super::controller::{create_center, delete_center, get_center, get_centers, update_center};

pub fn init_centers_router(state: &AppState) -> Router<AppState> {
    let managers = RoleSet::center_managers();

    Router::new()
        .route(
            "/",
            get(get_centers).merge(post(create_center).gated(state, managers)),
        )
        .route(
            "/{id}",
            get(get_center).merge(
                patch(update_center)
                    .delete(delete_center)
                    .gated(state, managers),
            ),
        )
}
