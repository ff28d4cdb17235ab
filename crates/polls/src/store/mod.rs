//! Store module for polls
//!
//! This module provides the store traits and implementations.

pub mod traits;
pub mod memory;

#[cfg(feature = "mongo")]
pub mod mongo;

use std::sync::Arc;
use tracing::info;

pub use traits::{PollSession, PollStore, StoreError, StoreResult};
pub use memory::InMemoryPollStore;

/// Store type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// In-memory store (fast, non-persistent)
    InMemory,
    /// MongoDB store (persistent)
    Mongo,
}

impl StoreType {
    /// Parse store type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "inmemory" | "in_memory" | "memory" => Some(StoreType::InMemory),
            "mongo" | "mongodb" => Some(StoreType::Mongo),
            _ => None,
        }
    }
}

/// Create a store from configuration
pub async fn create_store(config: &config::StoreConfig) -> StoreResult<Arc<dyn PollStore>> {
    let store_type = StoreType::parse(&config.backend)
        .ok_or_else(|| StoreError::Unavailable(format!("unknown store backend: {}", config.backend)))?;

    match store_type {
        StoreType::InMemory => {
            info!("Creating in-memory store");
            Ok(Arc::new(InMemoryPollStore::new()))
        }
        #[cfg(feature = "mongo")]
        StoreType::Mongo => {
            info!("Creating MongoDB store");
            let store = mongo::MongoPollStore::connect(&config.mongo).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "mongo"))]
        StoreType::Mongo => Err(StoreError::Unavailable(
            "MongoDB support not compiled in (enable the `mongo` feature)".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_type_parse() {
        assert_eq!(StoreType::parse("memory"), Some(StoreType::InMemory));
        assert_eq!(StoreType::parse("InMemory"), Some(StoreType::InMemory));
        assert_eq!(StoreType::parse("mongo"), Some(StoreType::Mongo));
        assert_eq!(StoreType::parse("MongoDB"), Some(StoreType::Mongo));
        assert_eq!(StoreType::parse("redis"), None);
    }

    #[tokio::test]
    async fn test_create_memory_store() {
        let config = config::StoreConfig::default();
        let store = create_store(&config).await.unwrap();
        let mut session = store.session().await.unwrap();
        assert!(session.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_unknown_backend_fails() {
        let config = config::StoreConfig {
            backend: "cassandra".to_string(),
            ..Default::default()
        };
        assert!(create_store(&config).await.is_err());
    }
}
