//! Service configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                        | Default                          |
//! |---------------------------------|----------------------------------|
//! | `SALESDESK_DB_PATH`             | `salesdesk.db`                   |
//! | `SALESDESK_DB_MAX_CONNECTIONS`  | `5`                              |
//! | `SALESDESK_RUN_MIGRATIONS`      | `true`                           |
//! | `SALESDESK_SALE_NUMBER_PREFIX`  | `SALE`                           |
//! | `SALESDESK_LOG`                 | `info,salesdesk=debug,sqlx=warn` |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use salesdesk_db::DbConfig;

use crate::sale_number::MAX_PREFIX_LEN;
use crate::telemetry::DEFAULT_LOG_FILTER;

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// SQLite database file (`:memory:` for a throwaway database)
    pub database_path: PathBuf,

    /// Maximum pool connections
    pub max_connections: u32,

    /// Apply embedded migrations on connect
    pub run_migrations: bool,

    /// Leading segment of generated sale numbers
    pub sale_number_prefix: String,

    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset
    pub log_filter: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// ```rust
    /// use salesdesk_service::config::ServiceConfig;
    ///
    /// let config = ServiceConfig::from_lookup(|key| match key {
    ///     "SALESDESK_SALE_NUMBER_PREFIX" => Some("POS".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.sale_number_prefix, "POS");
    /// assert_eq!(config.max_connections, 5);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ServiceConfig {
            database_path: lookup("SALESDESK_DB_PATH")
                .unwrap_or_else(|| "salesdesk.db".to_string())
                .into(),

            max_connections: lookup("SALESDESK_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SALESDESK_DB_MAX_CONNECTIONS".to_string()))?,

            run_migrations: lookup("SALESDESK_RUN_MIGRATIONS")
                .unwrap_or_else(|| "true".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SALESDESK_RUN_MIGRATIONS".to_string()))?,

            sale_number_prefix: lookup("SALESDESK_SALE_NUMBER_PREFIX")
                .unwrap_or_else(|| "SALE".to_string()),

            log_filter: lookup("SALESDESK_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "SALESDESK_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        let prefix = &config.sale_number_prefix;
        if prefix.is_empty()
            || prefix.len() > MAX_PREFIX_LEN
            || !prefix.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ConfigError::InvalidSaleNumberPrefix(prefix.clone()));
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        let base = if self.database_path.as_os_str() == ":memory:" {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.database_path).max_connections(self.max_connections)
        };
        base.run_migrations(self.run_migrations)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Sale number prefix '{0}' must be 1-34 ASCII letters or digits")]
    InvalidSaleNumberPrefix(String),
}
