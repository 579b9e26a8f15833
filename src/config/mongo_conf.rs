use std::env;

use tracing::{debug, error, info};

use crate::config::{parse_or_default, ConfigError};

/// MongoDB configuration structure
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// MongoDB connection URI
    pub uri: String,
    /// Database name
    pub database: String,
    /// Username for authentication (optional)
    pub username: Option<String>,
    /// Password for authentication (optional)
    pub password: Option<String>,
    pub users_collection: String,
    pub packages_collection: String,
    pub bookings_collection: String,
    /// Connection pool size
    pub pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
}

impl MongoConfig {
    /// Load MongoDB configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MONGO_URI: MongoDB connection URI (required)
    /// - MONGO_DATABASE: Database name (required)
    /// - MONGO_USERS_COLLECTION / MONGO_PACKAGES_COLLECTION / MONGO_BOOKINGS_COLLECTION (optional)
    /// - MONGO_POOL_SIZE: Connection pool size (defaults to 10)
    /// - MONGO_CONNECTION_TIMEOUT: Connection timeout in seconds (defaults to 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading MongoDB configuration from environment variables");

        let uri = env::var("MONGO_URI").map_err(|_| {
            error!("MONGO_URI environment variable not found");
            ConfigError::EnvVarNotFound("MONGO_URI".to_string())
        })?;

        let database = env::var("MONGO_DATABASE").map_err(|_| {
            error!("MONGO_DATABASE environment variable not found");
            ConfigError::EnvVarNotFound("MONGO_DATABASE".to_string())
        })?;
        debug!("MongoDB database: {}", database);

        let username = env::var("MONGO_USERNAME").ok();
        let password = env::var("MONGO_PASSWORD").ok();
        if username.is_some() {
            debug!("MongoDB credentials provided");
        }

        let defaults = MongoConfig::default();
        let users_collection = env::var("MONGO_USERS_COLLECTION").unwrap_or(defaults.users_collection);
        let packages_collection = env::var("MONGO_PACKAGES_COLLECTION").unwrap_or(defaults.packages_collection);
        let bookings_collection = env::var("MONGO_BOOKINGS_COLLECTION").unwrap_or(defaults.bookings_collection);

        let pool_size = parse_or_default("MONGO_POOL_SIZE", defaults.pool_size)?;
        let connection_timeout_secs =
            parse_or_default("MONGO_CONNECTION_TIMEOUT", defaults.connection_timeout_secs)?;

        let config = MongoConfig {
            uri,
            database,
            username,
            password,
            users_collection,
            packages_collection,
            bookings_collection,
            pool_size,
            connection_timeout_secs,
        };

        config.validate()?;
        info!("MongoDB configuration loaded successfully");
        Ok(config)
    }

    /// Rejects empty names, a zero pool or timeout, and credentials set to empty strings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("URI", Some(&self.uri)),
            ("database", Some(&self.database)),
            ("users collection", Some(&self.users_collection)),
            ("packages collection", Some(&self.packages_collection)),
            ("bookings collection", Some(&self.bookings_collection)),
            ("username", self.username.as_ref()),
            ("password", self.password.as_ref()),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.map_or(false, |v| v.trim().is_empty())) {
            return Err(ConfigError::ValidationError(format!("MongoDB {} cannot be empty", name)));
        }
        if self.pool_size == 0 || self.connection_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "MongoDB pool size and connection timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "travel_agency".to_string(),
            username: None,
            password: None,
            users_collection: "users".to_string(),
            packages_collection: "packages".to_string(),
            bookings_collection: "bookings".to_string(),
            pool_size: 10,
            connection_timeout_secs: 5,
        }
    }
}
