use axum::{
    Router,
    routing::{get, patch, post},
};
use learnhub_auth::RoleSet;

use crate::middleware::role::Gated;
use crate::state::AppState;

use super::controller::{
    create_subject, delete_subject, get_subject, get_subjects, update_subject,
};

pub fn init_subjects_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_subjects).merge(post(create_subject).gated(state, RoleSet::staff())),
        )
        .route(
            "/{id}",
            get(get_subject).merge(
                patch(update_subject)
                    .delete(delete_subject)
                    .gated(state, RoleSet::staff()),
            ),
        )
}
