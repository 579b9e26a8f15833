use std::env;
use tracing::{debug, error, info, warn};

use crate::config::{parse_or_default, ConfigError};

const MIN_SECRET_LEN: usize = 32;

/// JWT configuration structure
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub jwt_secret: String,
    /// Access token expiration time in minutes
    pub access_token_expiration: i64,
    /// Refresh token expiration time in minutes
    pub refresh_token_expiration: i64,
    /// Stamped into `iss` and required on validation when set
    pub jwt_issuer: Option<String>,
    /// Stamped into `aud` and required on validation when set
    pub jwt_audience: Option<String>,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables
    ///
    /// Expected environment variables:
    /// - JWT_SECRET: Secret key for signing JWT tokens (required, at least 32 chars)
    /// - JWT_ACCESS_TOKEN_EXPIRY: Access token expiration in minutes (defaults to 60)
    /// - JWT_REFRESH_TOKEN_EXPIRY: Refresh token expiration in minutes (defaults to 10080 = 1 week)
    /// - JWT_ISSUER: JWT issuer (optional)
    /// - JWT_AUDIENCE: JWT audience (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading JWT configuration from environment variables");

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| {
            error!("JWT_SECRET environment variable not found");
            ConfigError::EnvVarNotFound("JWT_SECRET".to_string())
        })?;
        debug!("JWT secret loaded (length: {} chars)", jwt_secret.len());

        let config = JwtConfig {
            jwt_secret,
            access_token_expiration: parse_or_default("JWT_ACCESS_TOKEN_EXPIRY", 60)?,
            refresh_token_expiration: parse_or_default("JWT_REFRESH_TOKEN_EXPIRY", 10080)?,
            jwt_issuer: env::var("JWT_ISSUER").ok().filter(|s| !s.is_empty()),
            jwt_audience: env::var("JWT_AUDIENCE").ok().filter(|s| !s.is_empty()),
        };

        config.validate()?;
        info!("JWT configuration loaded successfully");
        Ok(config)
    }

    /// Validate the JWT configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            error!("JWT secret is too short (minimum {} characters required)", MIN_SECRET_LEN);
            return Err(ConfigError::ValidationError(format!(
                "JWT secret must be at least {} characters long",
                MIN_SECRET_LEN
            )));
        }
        if self.access_token_expiration <= 0 {
            return Err(ConfigError::ValidationError("Access token expiration must be greater than 0".to_string()));
        }
        if self.refresh_token_expiration <= 0 {
            return Err(ConfigError::ValidationError("Refresh token expiration must be greater than 0".to_string()));
        }
        if self.access_token_expiration >= self.refresh_token_expiration {
            warn!("Access token expiration is greater than or equal to refresh token expiration");
        }
        Ok(())
    }
}

/// Configuration used by tests and local tooling.
impl Default for JwtConfig {
    fn default() -> Self {
        JwtConfig {
            jwt_secret: "test_secret_key_for_jwt_testing_should_be_long_enough_for_security_purposes".to_string(),
            access_token_expiration: 60,
            refresh_token_expiration: 10080,
            jwt_issuer: Some("travel-agency-backend".to_string()),
            jwt_audience: Some("travel-agency-clients".to_string()),
        }
    }
}
