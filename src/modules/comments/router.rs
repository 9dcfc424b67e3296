use axum::{
    Router,
    routing::{get, patch, post},
};
use learnhub_auth::RoleSet;

use crate::middleware::role::Gated;
use crate::state::AppState;

use super::controller::{create_comment, delete_comment, get_comments, update_comment};

pub fn init_comments_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_comments).merge(post(create_comment).gated(state, RoleSet::all())),
        )
        .route(
            "/{id}",
            patch(update_comment)
                .delete(delete_comment)
                .gated(state, RoleSet::all()),
        )
}
