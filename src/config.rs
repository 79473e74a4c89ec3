//! Application configuration loaded from environment variables.
//!
//! # Configuration Hierarchy
//!
//! All configuration is loaded from environment variables with sensible defaults
//! for development. A `.env` file in the working directory is read first when
//! present. Empty variables count as unset.
//!
//! # Server
//!
//! - `HOST` / `PORT`: bind address (default: `localhost:8080`)
//! - `READ_TIMEOUT` / `WRITE_TIMEOUT`: seconds (default: 30)
//!
//! # Relay
//!
//! - `RELAY_TIMEOUT_SECS`: default outbound timeout (default: 30)
//! - `MAX_REQUEST_BODY_SIZE`: inbound body limit in bytes (default: 10MB)
//! - `CORS_ALLOWED_ORIGINS`: comma-separated origins (default: `*`)
//!
//! # Logging
//!
//! - `RUST_LOG`: `EnvFilter` directives for the service log (default: `info`)
//!
//! # Reserved
//!
//! The `DB_*` and `JWT_*` variables are loaded so deployments can set them
//! today, but no component reads them yet.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};

const REDACTED: &str = "[redacted]";

/// Application configuration loaded from environment variables.
///
/// # Example
///
/// ```rust,ignore
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.server_addr());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub relay: RelayConfig,

    /// Maximum request body size in bytes (default: 10MB)
    pub max_request_body_size: usize,

    /// Allowed CORS origins; `*` allows any origin
    pub cors_allowed_origins: Vec<String>,

    /// Log filter (e.g., "info", "relay_api=debug")
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind host (default: "localhost")
    pub host: String,
    /// Bind port (default: 8080)
    pub port: u16,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

/// Database connection settings. Reserved; nothing connects yet.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

/// Token signing settings. Reserved for the authentication hook.
#[derive(Clone, PartialEq, Eq)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime (`JWT_EXPIRE_TIME` is in hours)
    pub expire_time: Duration,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &REDACTED)
            .field("expire_time", &self.expire_time)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Outbound timeout when a relay request does not set its own
    pub timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if the resulting configuration is
    /// unusable (see [`Config::validate`]).
    pub fn from_env() -> AppResult<Self> {
        // Load an .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);
        let defaults = Self::default();

        let config = Self {
            server: ServerConfig {
                host: vars.string("HOST", defaults.server.host),
                port: vars.parse("PORT", defaults.server.port),
                read_timeout: Duration::from_secs(vars.parse("READ_TIMEOUT", 30)),
                write_timeout: Duration::from_secs(vars.parse("WRITE_TIMEOUT", 30)),
            },
            database: DatabaseConfig {
                host: vars.string("DB_HOST", defaults.database.host),
                port: vars.parse("DB_PORT", defaults.database.port),
                user: vars.string("DB_USER", defaults.database.user),
                password: vars.string("DB_PASSWORD", defaults.database.password),
                name: vars.string("DB_NAME", defaults.database.name),
                ssl_mode: vars.string("DB_SSL_MODE", defaults.database.ssl_mode),
            },
            jwt: JwtConfig {
                secret: vars.string("JWT_SECRET", defaults.jwt.secret),
                expire_time: Duration::from_secs(
                    vars.parse("JWT_EXPIRE_TIME", 24u64).saturating_mul(3600),
                ),
            },
            relay: RelayConfig {
                timeout: Duration::from_secs(vars.parse("RELAY_TIMEOUT_SECS", 30)),
            },
            max_request_body_size: vars
                .parse("MAX_REQUEST_BODY_SIZE", defaults.max_request_body_size),
            cors_allowed_origins: vars
                .get("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_list(&raw))
                .unwrap_or(defaults.cors_allowed_origins),
            log_level: vars.string("RUST_LOG", defaults.log_level),
        };

        // Validate configuration before returning
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values for consistency and correctness.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if validation fails.
    pub fn validate(&self) -> AppResult<()> {
        if self.server.port == 0 {
            return Err(AppError::ConfigError(
                "PORT must be greater than 0".to_string(),
            ));
        }

        if self.relay.timeout.is_zero() {
            return Err(AppError::ConfigError(
                "RELAY_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        if self.max_request_body_size == 0 {
            return Err(AppError::ConfigError(
                "MAX_REQUEST_BODY_SIZE must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the full server address for binding.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log filter built from `log_level`.
    ///
    /// An unparseable directive falls back to `info` with a warning.
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|e| {
            warn!(level = %self.log_level, error = %e, "Invalid RUST_LOG, using info");
            EnvFilter::new("info")
        })
    }

    /// True when any origin may call the API.
    pub fn cors_allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|o| o == "*")
    }
}

/// Default configuration for testing and development.
///
/// Production deployments should use `Config::from_env()` instead.
impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "localhost".to_string(),
                port: 8080,
                read_timeout: Duration::from_secs(30),
                write_timeout: Duration::from_secs(30),
            },
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 5432,
                user: "postgres".to_string(),
                password: String::new(),
                name: "relay_api".to_string(),
                ssl_mode: "disable".to_string(),
            },
            jwt: JwtConfig {
                secret: "your-secret-key".to_string(),
                expire_time: Duration::from_secs(24 * 3600),
            },
            relay: RelayConfig {
                timeout: Duration::from_secs(30),
            },
            max_request_body_size: 10 * 1024 * 1024, // 10MB
            cors_allowed_origins: vec!["*".to_string()],
            log_level: "info".to_string(),
        }
    }
}

/// Variable source with empty-means-unset semantics.
struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn string(&self, name: &str, default: String) -> String {
        self.get(name).unwrap_or(default)
    }

    /// Parse a variable, falling back to `default` when it is unset or invalid.
    fn parse<T>(&self, name: &str, default: T) -> T
    where
        T: FromStr + fmt::Display,
        T::Err: fmt::Display,
    {
        let Some(raw) = self.get(name) else {
            return default;
        };

        match raw.trim().parse() {
            Ok(value) => value,
            Err(e) => {
                warn!(variable = name, value = %raw, error = %e, %default, "Invalid value, using default");
                default
            }
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
