//! Application state management
//!
//! Bundles the configuration with the document store every service works
//! against.
//!
//! # Design Principles
//!
//! 1. **Built once**: the CLI creates the state at startup
//! 2. **Cheap cloning**: all fields are behind `Arc`
//! 3. **Swappable storage**: services only see [`KeyValueStore`]

use std::sync::Arc;

use crate::config::AppConfig;
use crate::repositories::{FileStore, KeyValueStore, MemoryStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Document store for sessions and the weight log
    pub store: Arc<dyn KeyValueStore>,
}

impl AppState {
    /// State backed by files in the configured data directory
    pub fn new(config: AppConfig) -> Self {
        let store = FileStore::new(config.storage.data_dir.clone());
        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Default configuration over an in-memory store
    pub fn in_memory() -> Self {
        Self::with_store(AppConfig::default(), Arc::new(MemoryStore::new()))
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}
