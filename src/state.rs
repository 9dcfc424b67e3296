use std::sync::Arc;

use learnhub_auth::TokenService;
use learnhub_config::{AppConfig, CorsConfig};
use sqlx::PgPool;

/// Shared, immutable application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: Arc<TokenService>,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(db: PgPool, tokens: Arc<TokenService>, cors_config: CorsConfig) -> Self {
        Self {
            db,
            tokens,
            cors_config,
        }
    }

    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db = learnhub_db::init_db_pool(&config.database).await?;
        let tokens = Arc::new(TokenService::new(&config.jwt));

        Ok(Self::new(db, tokens, config.cors.clone()))
    }
}
