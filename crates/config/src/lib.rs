//! Configuration for the Ballots service
//!
//! A single YAML document with four optional sections. Anything missing
//! falls back to the values in [`defaults`].

use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "ballots.yaml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BallotsConfig {
    #[serde(default)]
    pub server: ListenConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Environment variables the file referenced but that were not set.
    /// Filled by [`load_config`]; never read from or written to YAML.
    #[serde(skip)]
    pub unresolved_env_vars: Vec<String>,
}

/// Where the HTTP listener binds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Poll store selection.
///
/// `backend` is matched case-insensitively by the store factory
/// (`memory` or `mongo`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_backend")]
    pub backend: String,
    #[serde(default)]
    pub mongo: MongoConfig,
}

impl StoreConfig {
    pub fn is_mongo(&self) -> bool {
        matches!(self.backend.to_lowercase().as_str(), "mongo" | "mongodb")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            mongo: MongoConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MongoConfig {
    #[serde(default = "default_mongo_uri")]
    pub uri: String,
    #[serde(default = "default_mongo_database")]
    pub database: String,
    #[serde(default = "default_mongo_collection")]
    pub collection: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: default_mongo_uri(),
            database: default_mongo_database(),
            collection: default_mongo_collection(),
        }
    }
}

/// Turn a bare host (`localhost`, `db:27017`) into a connection string.
/// Values that already carry a scheme are returned unchanged.
pub fn normalize_mongo_uri(value: &str) -> String {
    if value.contains("://") {
        value.to_string()
    } else {
        format!("mongodb://{}", value)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `pretty`, `json` or `compact`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_config() {
        let yaml = include_str!("../../../configs/ballots.yaml");
        let config: BallotsConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.store.mongo.database, "ballots");
        assert_eq!(config.store.mongo.collection, "polls");
        assert_eq!(config.auth.api_key, "${BALLOTS_API_KEY}");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: BallotsConfig = serde_yaml::from_str("server:\n  port: 9000\n").unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.store, StoreConfig::default());
        assert_eq!(config.auth.api_key, DEV_API_KEY);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_mongo_section() {
        let yaml = "store:\n  backend: mongo\n  mongo:\n    uri: mongodb://db:27017\n";
        let config: BallotsConfig = serde_yaml::from_str(yaml).unwrap();

        assert!(config.store.is_mongo());
        assert_eq!(config.store.mongo.uri, "mongodb://db:27017");
        assert_eq!(config.store.mongo.database, "ballots");
    }

    #[test]
    fn test_is_mongo() {
        let mut store = StoreConfig::default();
        assert!(!store.is_mongo());

        store.backend = "MongoDB".into();
        assert!(store.is_mongo());
    }

    #[test]
    fn test_normalize_mongo_uri() {
        assert_eq!(normalize_mongo_uri("localhost"), "mongodb://localhost");
        assert_eq!(normalize_mongo_uri("db:27017"), "mongodb://db:27017");
        assert_eq!(
            normalize_mongo_uri("mongodb+srv://cluster.example.net"),
            "mongodb+srv://cluster.example.net"
        );
    }
}
