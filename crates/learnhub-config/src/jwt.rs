//! JWT signing configuration.
//!
//! Access and refresh tokens are signed with two independent HMAC keys so a
//! leaked access key cannot mint long-lived refresh tokens. Both keys are
//! supplied by the environment; there are no built-in fallbacks.
//!
//! # Environment Variables
//!
//! - `JWT_ACCESS_SECRET`: key for access tokens (required)
//! - `JWT_REFRESH_SECRET`: key for refresh tokens (required, must differ)
//! - `JWT_ACCESS_EXPIRY`: access token lifetime in seconds (default: 900)
//! - `JWT_REFRESH_EXPIRY`: refresh token lifetime in seconds (default: 604800)

use std::env;
use std::fmt;

pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 15 * 60;
pub const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 7 * 24 * 60 * 60;
/// Upper bound for either lifetime: ten years.
pub const MAX_TOKEN_EXPIRY: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Clone, PartialEq, Eq)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    /// Builds a config with the default lifetimes and validates the keys.
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let config = Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_token_expiry: DEFAULT_ACCESS_TOKEN_EXPIRY,
            refresh_token_expiry: DEFAULT_REFRESH_TOKEN_EXPIRY,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let access_secret = env::var("JWT_ACCESS_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_ACCESS_SECRET must be set"))?;
        let refresh_secret = env::var("JWT_REFRESH_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_REFRESH_SECRET must be set"))?;

        let config = Self {
            access_secret,
            refresh_secret,
            access_token_expiry: env::var("JWT_ACCESS_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_ACCESS_TOKEN_EXPIRY),
            refresh_token_expiry: env::var("JWT_REFRESH_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_REFRESH_TOKEN_EXPIRY),
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects empty or shared keys and lifetimes outside `1..=MAX_TOKEN_EXPIRY`.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.access_secret.trim().is_empty() {
            anyhow::bail!("JWT access secret must not be empty");
        }
        if self.refresh_secret.trim().is_empty() {
            anyhow::bail!("JWT refresh secret must not be empty");
        }
        if self.access_secret == self.refresh_secret {
            anyhow::bail!("JWT access and refresh secrets must differ");
        }
        if self.access_token_expiry <= 0 || self.refresh_token_expiry <= 0 {
            anyhow::bail!("JWT token lifetimes must be positive");
        }
        if self.access_token_expiry > MAX_TOKEN_EXPIRY
            || self.refresh_token_expiry > MAX_TOKEN_EXPIRY
        {
            anyhow::bail!("JWT token lifetimes must not exceed {MAX_TOKEN_EXPIRY} seconds");
        }
        Ok(())
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &"[redacted]")
            .field("refresh_secret", &"[redacted]")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_lifetimes() {
        let config = JwtConfig::new("access-key", "refresh-key").unwrap();
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604800);
    }

    #[test]
    fn test_rejects_shared_key() {
        let err = JwtConfig::new("same-key", "same-key").unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_rejects_empty_keys() {
        assert!(JwtConfig::new("", "refresh-key").is_err());
        assert!(JwtConfig::new("access-key", "   ").is_err());
    }

    #[test]
    fn test_rejects_non_positive_lifetime() {
        let mut config = JwtConfig::new("access-key", "refresh-key").unwrap();
        config.access_token_expiry = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_lifetime() {
        let mut config = JwtConfig::new("access-key", "refresh-key").unwrap();
        config.refresh_token_expiry = i64::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must not exceed"));

        config.refresh_token_expiry = MAX_TOKEN_EXPIRY;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = JwtConfig::new("super-secret-a", "super-secret-b").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[redacted]"));
    }
}
