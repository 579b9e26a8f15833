use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::{error, warn};

pub mod admin_user_conf;
pub mod app_conf;
pub mod jwt_conf;
pub mod mongo_conf;

pub use admin_user_conf::AdminUserConfig;
pub use app_conf::AppConfig;
pub use jwt_conf::JwtConfig;
pub use mongo_conf::MongoConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Parses `name` from the environment, falling back to `default` when it is unset.
pub(crate) fn parse_or_default<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| {
            error!("Invalid {} value: {}", name, raw);
            ConfigError::InvalidValue(format!("Invalid {} value", name))
        }),
        Err(_) => {
            warn!("{} not set, using default: {}", name, default);
            Ok(default)
        }
    }
}
