//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

use chrono::Duration;

/// Longest accepted token lifetime: one year
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// HMAC secret for bearer tokens
    pub jwt_secret: String,

    /// Lifetime of issued bearer tokens, in hours
    pub token_ttl_hours: i64,

    /// bcrypt work factor
    pub bcrypt_cost: u32,

    /// Browser origin allowed by CORS (any origin when unset)
    pub cors_allowed_origin: Option<String>,

    /// Emit JSON log lines
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL")
            .or_else(|| get("DB_DSN"))
            .ok_or(ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = get("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = get("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = get("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::MissingEnv("JWT_SECRET"))?;

        let token_ttl_hours = get("TOKEN_TTL_HOURS")
            .unwrap_or_else(|| "24".to_string())
            .parse()
            .ok()
            .filter(|hours: &i64| (1..=MAX_TOKEN_TTL_HOURS).contains(hours))
            .ok_or(ConfigError::InvalidValue("TOKEN_TTL_HOURS"))?;

        let bcrypt_cost = get("BCRYPT_COST")
            .map(|v| v.parse().ok())
            .unwrap_or(Some(bcrypt::DEFAULT_COST))
            .filter(|cost: &u32| (4..=31).contains(cost))
            .ok_or(ConfigError::InvalidValue("BCRYPT_COST"))?;

        let cors_allowed_origin = get("CORS_ALLOWED_ORIGIN");

        let log_json = get("LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            jwt_secret,
            token_ttl_hours,
            bcrypt_cost,
            cors_allowed_origin,
            log_json,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Token lifetime as a duration
    pub fn token_ttl(&self) -> Duration {
        Duration::hours(self.token_ttl_hours)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_applied() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/pft"), ("JWT_SECRET", "s3cr3t")]).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.token_ttl(), Duration::hours(24));
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(config.cors_allowed_origin.is_none());
        assert!(!config.log_json);
        assert!(!config.is_production());
    }

    #[test]
    fn test_db_dsn_fallback() {
        let config = load(&[("DB_DSN", "postgres://db/app"), ("JWT_SECRET", "x")]).unwrap();
        assert_eq!(config.database_url, "postgres://db/app");
    }

    #[test]
    fn test_missing_required() {
        assert!(matches!(
            load(&[("JWT_SECRET", "x")]),
            Err(ConfigError::MissingEnv("DATABASE_URL"))
        ));
        assert!(matches!(
            load(&[("DATABASE_URL", "postgres://db/app"), ("JWT_SECRET", "  ")]),
            Err(ConfigError::MissingEnv("JWT_SECRET"))
        ));
    }

    #[test]
    fn test_invalid_values() {
        let base = [("DATABASE_URL", "postgres://db/app"), ("JWT_SECRET", "x")];

        let with = |key: &'static str, value: &'static str| {
            let mut vars = base.to_vec();
            vars.push((key, value));
            load(&vars)
        };

        assert!(matches!(with("PORT", "http"), Err(ConfigError::InvalidValue("PORT"))));
        assert!(matches!(
            with("TOKEN_TTL_HOURS", "0"),
            Err(ConfigError::InvalidValue("TOKEN_TTL_HOURS"))
        ));
        assert!(matches!(
            with("TOKEN_TTL_HOURS", "1000000000000"),
            Err(ConfigError::InvalidValue("TOKEN_TTL_HOURS"))
        ));
        assert!(matches!(
            with("TOKEN_TTL_HOURS", "8785"),
            Err(ConfigError::InvalidValue("TOKEN_TTL_HOURS"))
        ));
        assert_eq!(
            with("TOKEN_TTL_HOURS", "8784").unwrap().token_ttl(),
            Duration::hours(8784)
        );
        assert!(matches!(
            with("BCRYPT_COST", "3"),
            Err(ConfigError::InvalidValue("BCRYPT_COST"))
        ));
        assert!(matches!(
            with("BCRYPT_COST", "twelve"),
            Err(ConfigError::InvalidValue("BCRYPT_COST"))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/app"),
            ("JWT_SECRET", "x"),
            ("PORT", "3000"),
            ("ENVIRONMENT", "production"),
            ("TOKEN_TTL_HOURS", "2"),
            ("BCRYPT_COST", "10"),
            ("CORS_ALLOWED_ORIGIN", "http://localhost:5173"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.token_ttl(), Duration::hours(2));
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.cors_allowed_origin.as_deref(), Some("http://localhost:5173"));
        assert!(config.log_json);
    }
}
