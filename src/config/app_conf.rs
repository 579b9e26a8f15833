use std::env;

use crate::config::ConfigError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Insert the sample catalogue on startup when no package exists yet.
    pub seed_sample_packages: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("APP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue(format!("APP_PORT: {}", raw)))?,
            Err(_) => 5001,
        };
        let seed_sample_packages = match env::var("SEED_SAMPLE_PACKAGES") {
            Ok(raw) => parse_flag(&raw)
                .ok_or_else(|| ConfigError::InvalidValue(format!("SEED_SAMPLE_PACKAGES: {}", raw)))?,
            Err(_) => false,
        };
        let config = AppConfig { host, port, seed_sample_packages };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::ValidationError("APP_HOST cannot be empty".to_string()));
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_flag;

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" YES "), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
    }

    #[test]
    fn test_parse_flag_rejects_garbage() {
        assert_eq!(parse_flag("maybe"), None);
    }
}
