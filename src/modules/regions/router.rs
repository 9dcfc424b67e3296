use axum::{
    Router,
    routing::{get, patch, post},
};
use learnhub_auth::RoleSet;

use crate::middleware::role::Gated;
use crate::state::AppState;

use super::controller::{create_region, delete_region, get_region, get_regions, update_region};

pub fn init_regions_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_regions).merge(post(create_region).gated(state, RoleSet::staff())),
        )
        .route(
            "/{id}",
            get(get_region).merge(
                patch(update_region)
                    .delete(delete_region)
                    .gated(state, RoleSet::staff()),
            ),
        )
}
