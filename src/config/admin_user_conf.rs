use std::env;

use crate::config::ConfigError;

/// Credentials of the account bootstrapped as the first administrator.
#[derive(Debug, Clone)]
pub struct AdminUserConfig {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl AdminUserConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = AdminUserConfig {
            name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin User".to_string()),
            email: env::var("ADMIN_EMAIL").map_err(|_| ConfigError::EnvVarNotFound("ADMIN_EMAIL".to_string()))?,
            password: env::var("ADMIN_PASSWORD").map_err(|_| ConfigError::EnvVarNotFound("ADMIN_PASSWORD".to_string()))?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.email.contains('@') {
            return Err(ConfigError::ValidationError("ADMIN_EMAIL must be an email address".to_string()));
        }
        if self.password.len() < 6 {
            return Err(ConfigError::ValidationError("ADMIN_PASSWORD must be at least 6 characters".to_string()));
        }
        Ok(())
    }
}
