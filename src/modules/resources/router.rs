use axum::{
    Router,
    routing::{get, patch, post},
};
use learnhub_auth::RoleSet;

use crate::middleware::role::Gated;
use crate::state::AppState;

use super::controller::{
    create_category, create_resource, delete_category, delete_resource, get_categories,
    get_category, get_resource, get_resources, update_category, update_resource,
};

pub fn init_resource_categories_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_categories).merge(post(create_category).gated(state, RoleSet::staff())),
        )
        .route(
            "/{id}",
            get(get_category).merge(
                patch(update_category)
                    .delete(delete_category)
                    .gated(state, RoleSet::staff()),
            ),
        )
}

/// Anyone signed in may publish; editing is limited to the publisher and staff.
pub fn init_resources_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_resources).merge(post(create_resource).gated(state, RoleSet::all())),
        )
        .route(
            "/{id}",
            get(get_resource).merge(
                patch(update_resource)
                    .delete(delete_resource)
                    .gated(state, RoleSet::all()),
            ),
        )
}
