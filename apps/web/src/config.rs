//! Web server configuration.
//!
//! ## Sources (lowest to highest priority)
//! 1. Defaults (this file, plus `InventoryPolicy::default()`)
//! 2. `config/pharmacy.toml` (optional)
//! 3. Environment variables `PHARMACY__<SECTION>__<KEY>`,
//!    e.g. `PHARMACY__SERVER__PORT=8080`
//! 4. `PHARMACY_DB_PATH` for the database file
//!
//! ```toml
//! [server]
//! port = 5000
//!
//! [policy]
//! low_stock_threshold = 5
//! ```

use config::{Config, Environment, File};
use pharmacy_core::{InventoryPolicy, ValidationError};
use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;

/// Config file looked up relative to the working directory (extension optional).
pub const CONFIG_FILE: &str = "config/pharmacy";

/// Environment variable that overrides `database.path`.
pub const DB_PATH_ENV: &str = "PHARMACY_DB_PATH";

/// Complete web server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub store: StoreConfig,
    pub policy: InventoryPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file, created on first start.
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: "./pharmacy.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Store identity, shown on the dashboard and invoices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub name: String,
    pub currency_symbol: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: "Pharmacy".to_string(),
            currency_symbol: "₹".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from all sources and validates it.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Like [`AppConfig::load`] with an explicit config file path.
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("PHARMACY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(path) = env::var(DB_PATH_ENV) {
            builder = builder.set_override("database.path", path)?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Rejects values the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue("server.port".to_string()));
        }

        if self.database.path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("database.path".to_string()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "database.max_connections".to_string(),
            ));
        }

        self.policy.validate()?;

        Ok(())
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("server.host".to_string()))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid inventory policy: {0}")]
    Policy(#[from] ValidationError),
}
