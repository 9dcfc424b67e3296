use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use learnhub_auth::RoleSet;

use crate::middleware::role::Gated;
use crate::state::AppState;

use super::controller::{
    create_registration, delete_registration, get_my_registrations, get_registrations,
    update_registration_status,
};

pub fn init_registrations_router(state: &AppState) -> Router<AppState> {
    let managers = RoleSet::center_managers();
    let everyone = RoleSet::all();

    Router::new()
        .route(
            "/",
            post(create_registration)
                .gated(state, everyone)
                .merge(get(get_registrations).gated(state, managers)),
        )
        .route("/me", get(get_my_registrations).gated(state, everyone))
        .route(
            "/{id}/status",
            patch(update_registration_status).gated(state, managers),
        )
        .route("/{id}", delete(delete_registration).gated(state, everyone))
}
