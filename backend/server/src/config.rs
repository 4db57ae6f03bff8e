use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

const DEV_SESSION_SECRET: &str = "dev-secret-change-in-production";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Redis,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store: StoreKind,
    pub redis_url: String,
    pub admin_email: String,
    pub resend_api_key: String,
    pub session_secret: String,
    pub session_expiry_days: i64,
    pub magic_link_expiry_minutes: i64,
    pub frontend_url: String,
    pub environment: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self {
            port: try_load("RUST_PORT", "8000")?,
            store: try_load("STORE", "redis")?,
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379")?,
            admin_email: try_load("ADMIN_EMAIL", "admin@example.com")?,
            resend_api_key: read_secret("RESEND_API_KEY").unwrap_or_default(),
            session_secret: read_secret("SESSION_SECRET")
                .unwrap_or_else(|| DEV_SESSION_SECRET.to_string()),
            session_expiry_days: try_load("SESSION_EXPIRY_DAYS", "7")?,
            magic_link_expiry_minutes: try_load("MAGIC_LINK_EXPIRY_MINUTES", "15")?,
            frontend_url: try_load("FRONTEND_URL", "http://localhost:5173")?,
            environment: try_load("ENVIRONMENT", "development")?,
        };

        if config.session_secret == DEV_SESSION_SECRET {
            if !config.is_development() {
                return Err(ConfigError::Invalid {
                    key: "SESSION_SECRET",
                    value: String::new(),
                    reason: format!("must be set when ENVIRONMENT is {}", config.environment),
                });
            }

            warn!("SESSION_SECRET not set, sessions are signed with the development secret");
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Browser origins allowed to call the API with credentials.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![
            self.frontend_url.clone(),
            self.frontend_url.replace("localhost", "127.0.0.1"),
            self.frontend_url.replace("127.0.0.1", "localhost"),
        ];
        origins.sort();
        origins.dedup();

        origins
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            store: StoreKind::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            admin_email: "admin@example.com".to_string(),
            resend_api_key: String::new(),
            session_secret: DEV_SESSION_SECRET.to_string(),
            session_expiry_days: 7,
            magic_link_expiry_minutes: 15,
            frontend_url: "http://localhost:5173".to_string(),
            environment: "development".to_string(),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");

        ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }
    })
}

/// Docker secret first, then the plain environment variable.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    match read_to_string(&path) {
        Ok(secret) => Some(secret.trim().to_string()),
        Err(_) => var(secret_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_kind() {
        assert_eq!("redis".parse::<StoreKind>(), Ok(StoreKind::Redis));
        assert_eq!("Memory".parse::<StoreKind>(), Ok(StoreKind::Memory));
        assert!("postgres".parse::<StoreKind>().is_err());
    }

    #[test]
    fn test_invalid_value() {
        let err = try_load::<u16>("COFFEE_TEST_UNSET_PORT", "not-a-port").unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Invalid { key: "COFFEE_TEST_UNSET_PORT", ref value, .. } if value == "not-a-port"
        ));
    }

    #[test]
    fn test_default_used() {
        let days: i64 = try_load("COFFEE_TEST_UNSET_DAYS", "7").unwrap();

        assert_eq!(days, 7);
    }

    #[test]
    fn test_allowed_origins() {
        let config = Config::default();

        assert_eq!(
            config.allowed_origins(),
            ["http://127.0.0.1:5173", "http://localhost:5173"]
        );
    }
}
