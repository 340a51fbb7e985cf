//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use presence_core::TrackedStatuses;
use std::env;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub tracker: TrackerConfig,
    pub logging: LoggingConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Session store configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Presence tracker configuration
#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    /// Statuses that count toward session time
    pub tracked_statuses: TrackedStatuses,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Copy)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl LoggingConfig {
    fn for_environment(env: Environment) -> Self {
        Self {
            format: if env.is_production() {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            },
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "presence-tracker".to_string()
}

fn default_database_url() -> String {
    "sqlite://presence_tracker.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is present but holds an invalid value
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = match lookup("APP_ENV") {
            Some(raw) => Environment::parse(&raw)
                .ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
            None => Environment::default(),
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS", raw)),
            },
            None => default_max_connections(),
        };

        let tracked_statuses = match lookup("TRACKED_STATUSES") {
            Some(raw) => TrackedStatuses::parse_list(&raw)
                .map_err(|e| ConfigError::InvalidValue("TRACKED_STATUSES", e.to_string()))?,
            None => TrackedStatuses::default(),
        };

        let logging = match lookup("LOG_FORMAT") {
            Some(raw) => {
                let format = match raw.trim().to_lowercase().as_str() {
                    "json" => Some(LogFormat::Json),
                    "pretty" => Some(LogFormat::Pretty),
                    _ => None,
                };
                LoggingConfig {
                    format: format.ok_or(ConfigError::InvalidValue("LOG_FORMAT", raw))?,
                }
            }
            None => LoggingConfig::for_environment(app_env),
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: app_env,
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or_else(default_database_url),
                max_connections,
            },
            tracker: TrackerConfig { tracked_statuses },
            logging,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
