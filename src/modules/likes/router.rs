use axum::{
    Router,
    routing::{delete, get, post},
};
use learnhub_auth::RoleSet;

use crate::middleware::role::Gated;
use crate::state::AppState;

use super::controller::{get_my_likes, like_center, unlike_center};

pub fn init_likes_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(like_center))
        .route("/me", get(get_my_likes))
        .route("/{center_id}", delete(unlike_center))
        .gated(state, RoleSet::all())
}
