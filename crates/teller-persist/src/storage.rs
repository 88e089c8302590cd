use crate::error::Result;

/// Client-local durable key-value storage
///
/// No transactions: every `set` replaces the whole value. Implementations
/// may be size-limited and must report that as `PersistError::QuotaExceeded`
/// instead of truncating.
pub trait KeyValueStore: Send + Sync {
    /// Stored text for `key`, or `None` when absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}
