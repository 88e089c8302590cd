use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{PersistError, Result};
use crate::storage::KeyValueStore;
use crate::stores::{FileStore, MemoryStore};
use crate::thread_store::{ThreadStore, THREADS_KEY};

/// `[storage]` section of the application config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the file store; `~/.teller/storage` when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,

    #[serde(default)]
    pub quota_bytes: Option<usize>,

    /// Keep threads in memory only
    #[serde(default)]
    pub in_memory: bool,
}

pub struct ThreadStoreBuilder {
    storage: Option<Arc<dyn KeyValueStore>>,
    directory: Option<PathBuf>,
    quota_bytes: Option<usize>,
    in_memory: bool,
    key: String,
}

impl ThreadStoreBuilder {
    pub fn new() -> Self {
        Self {
            storage: None,
            directory: None,
            quota_bytes: None,
            in_memory: false,
            key: THREADS_KEY.to_string(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        let mut builder = Self::new();
        builder.directory = config.directory.clone();
        builder.quota_bytes = config.quota_bytes;
        builder.in_memory = config.in_memory;
        builder
    }

    /// Use an already constructed store; directory and quota are ignored
    pub fn storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn quota_bytes(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn build(self) -> Result<ThreadStore> {
        if self.key.trim().is_empty() {
            return Err(PersistError::Internal("storage key is required".to_string()));
        }

        let storage: Arc<dyn KeyValueStore> = match self.storage {
            Some(storage) => storage,
            None if self.in_memory => {
                tracing::info!("Using in-memory thread storage");
                Arc::new(match self.quota_bytes {
                    Some(quota) => MemoryStore::with_quota(quota),
                    None => MemoryStore::new(),
                })
            }
            None => {
                let directory = self
                    .directory
                    .unwrap_or_else(FileStore::default_storage_dir);
                tracing::info!(directory = %directory.display(), "Using file thread storage");
                let store = FileStore::new(directory)?;
                Arc::new(match self.quota_bytes {
                    Some(quota) => store.with_quota(quota),
                    None => store,
                })
            }
        };

        Ok(ThreadStore::with_key(storage, self.key))
    }
}

impl Default for ThreadStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
