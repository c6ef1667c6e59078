//! Configuration loading for the Cinelog service
//!
//! Configuration comes from environment variables (optionally via a
//! `.env` file loaded with dotenvy). Each config struct provides a
//! typed `from_env()` constructor and a `validate()` pass so startup
//! fails with a clear message instead of a confusing runtime error.

use crate::error::CinelogError;
use std::time::Duration;

/// Loads `.env` if present; a missing file is not an error.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Database pool configuration
///
/// Environment variables:
/// - `DATABASE_URL` (required): PostgreSQL connection URL
/// - `DATABASE_MAX_CONNECTIONS` (default 20)
/// - `DATABASE_MIN_CONNECTIONS` (default 2)
/// - `DATABASE_ACQUIRE_TIMEOUT_SECS` (default 30)
/// - `DATABASE_IDLE_TIMEOUT_SECS` (default 600)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/cinelog".to_string(),
            max_connections: 20,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, CinelogError> {
        let defaults = DatabaseConfig::default();

        let url = std::env::var("DATABASE_URL")
            .map_err(|_| CinelogError::Config("DATABASE_URL must be set".to_string()))?;

        Ok(Self {
            url,
            max_connections: parse_env_var("DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: parse_env_var("DATABASE_MIN_CONNECTIONS", defaults.min_connections)?,
            acquire_timeout: Duration::from_secs(parse_env_var(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout.as_secs(),
            )?),
            idle_timeout: Duration::from_secs(parse_env_var(
                "DATABASE_IDLE_TIMEOUT_SECS",
                defaults.idle_timeout.as_secs(),
            )?),
        })
    }

    pub fn validate(&self) -> Result<(), CinelogError> {
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(CinelogError::Config(
                "DATABASE_URL must be a postgres:// URL".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(CinelogError::Config(
                "DATABASE_MAX_CONNECTIONS must be greater than zero".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(CinelogError::Config(
                "DATABASE_MIN_CONNECTIONS cannot exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP service configuration
///
/// Environment variables:
/// - `BIND_ADDRESS` (default `0.0.0.0:8080`)
/// - `FRONTEND_URL` (default `http://localhost:3000`): where the
///   Google OAuth callback redirects with issued tokens
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_address: String,
    pub frontend_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, CinelogError> {
        let defaults = ServiceConfig::default();
        Ok(Self {
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            frontend_url: std::env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
        })
    }

    pub fn validate(&self) -> Result<(), CinelogError> {
        if !self.bind_address.contains(':') {
            return Err(CinelogError::Config(
                "BIND_ADDRESS must be host:port".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T, CinelogError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| CinelogError::Config(format!("{} has an invalid value: {}", key, value))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.idle_timeout, Duration::from_secs(600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_url_scheme_rejected() {
        let config = DatabaseConfig {
            url: "mysql://localhost/cinelog".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_min_connections_cannot_exceed_max() {
        let config = DatabaseConfig {
            min_connections: 50,
            max_connections: 10,
            ..DatabaseConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_service_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bind_address_without_port_rejected() {
        let config = ServiceConfig {
            bind_address: "localhost".to_string(),
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
