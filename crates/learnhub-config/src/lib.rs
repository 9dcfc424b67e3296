//! # LearnHub Config
//!
//! Configuration types for the LearnHub API, loaded from environment
//! variables (a `.env` file is honored by the binaries through `dotenvy`).
//!
//! - [`jwt`]: token signing keys and lifetimes
//! - [`cors`]: allowed origins
//! - [`server`]: bind address, database, and logging settings
//!
//! [`AppConfig`] bundles everything the server needs and is built once at
//! startup, then handed to the application state. Nothing here is global.

pub mod cors;
pub mod jwt;
pub mod server;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use server::{DatabaseConfig, LoggingConfig, ServerConfig};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            cors: CorsConfig::from_env(),
            logging: LoggingConfig::from_env(),
        })
    }
}
