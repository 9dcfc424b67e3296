use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::auth::init_auth_router;
use crate::modules::branches::init_branches_router;
use crate::modules::centers::init_centers_router;
use crate::modules::comments::init_comments_router;
use crate::modules::likes::init_likes_router;
use crate::modules::professions::init_professions_router;
use crate::modules::regions::init_regions_router;
use crate::modules::registrations::init_registrations_router;
use crate::modules::resources::{init_resource_categories_router, init_resources_router};
use crate::modules::subjects::init_subjects_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Builds the application router. Role gates are attached per route inside
/// each module router, so everything not explicitly gated is public.
pub fn init_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", init_auth_router(&state))
        .nest("/users", init_users_router(&state))
        .nest("/regions", init_regions_router(&state))
        .nest("/centers", init_centers_router(&state))
        .nest("/branches", init_branches_router(&state))
        .nest("/subjects", init_subjects_router(&state))
        .nest("/professions", init_professions_router(&state))
        .nest("/comments", init_comments_router(&state))
        .nest("/likes", init_likes_router(&state))
        .nest("/registrations", init_registrations_router(&state))
        .nest(
            "/resource-categories",
            init_resource_categories_router(&state),
        )
        .nest("/resources", init_resources_router(&state));

    let cors = cors_layer(&state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health_check))
        .nest("/api", api)
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
