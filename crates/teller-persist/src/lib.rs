pub mod models;
pub mod storage;
pub mod stores;
pub mod thread_store;
pub mod error;
pub mod builder;

pub use models::{ChatMessage, ChatThread, DEFAULT_THREAD_TITLE};
pub use storage::KeyValueStore;
pub use stores::{FileStore, MemoryStore};
pub use thread_store::{ThreadStore, THREADS_KEY};
pub use error::PersistError;
pub use builder::{ThreadStoreBuilder, StorageConfig};
pub use teller_types::ChatRole;
