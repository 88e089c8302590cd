use std::collections::HashSet;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{now_millis, ChatMessage, ChatThread, DEFAULT_THREAD_TITLE};
use crate::storage::KeyValueStore;

/// Storage key of the persisted thread collection
pub const THREADS_KEY: &str = "chat_threads_v1";

const TITLE_MAX_CHARS: usize = 40;

/// Persisted chat threads, most recently created first
///
/// The whole collection lives under one key and is replaced on every save;
/// there is no merge. Reads never fail: missing, unreadable or malformed
/// data all come back as an empty list.
pub struct ThreadStore<S: KeyValueStore + ?Sized = dyn KeyValueStore> {
    storage: Arc<S>,
    key: String,
}

impl<S: KeyValueStore + ?Sized> ThreadStore<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_key(storage, THREADS_KEY)
    }

    pub fn with_key(storage: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn list_threads(&self) -> Vec<ChatThread> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to read threads, starting empty: {}", e);
                return Vec::new();
            }
        };

        let threads: Vec<ChatThread> = match serde_json::from_str(&raw) {
            Ok(threads) => threads,
            Err(e) => {
                tracing::warn!(key = %self.key, "Malformed thread data, starting empty: {}", e);
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let total = threads.len();
        let threads: Vec<ChatThread> = threads
            .into_iter()
            .filter(|t| seen.insert(t.id.clone()))
            .collect();
        if threads.len() != total {
            tracing::warn!(dropped = total - threads.len(), "Dropped threads with duplicate ids");
        }
        threads
    }

    /// Build a fresh thread; nothing is persisted until `save_threads`
    pub fn new_thread(&self, initial_message: Option<&str>) -> ChatThread {
        let now = now_millis();
        let initial = initial_message.map(str::trim).filter(|m| !m.is_empty());

        let title = initial
            .map(|m| m.chars().take(TITLE_MAX_CHARS).collect::<String>())
            .unwrap_or_else(|| DEFAULT_THREAD_TITLE.to_string());
        let messages = initial
            .map(|m| vec![ChatMessage::user(m).at(now)])
            .unwrap_or_default();

        ChatThread {
            id: generate_thread_id(),
            title,
            messages,
            created_at: now,
            updated_at: now,
        }
    }

    /// The collection without `id`; storage is untouched
    pub fn delete_thread(&self, threads: &[ChatThread], id: &str) -> Vec<ChatThread> {
        threads.iter().filter(|t| t.id != id).cloned().collect()
    }

    /// Replace the persisted collection with `threads` in a single write
    pub fn save_threads(&self, threads: &[ChatThread]) -> Result<()> {
        let json = serde_json::to_string(threads)?;
        self.storage.set(&self.key, &json)?;
        tracing::debug!(key = %self.key, count = threads.len(), "Threads saved");
        Ok(())
    }

    /// Push `message` and bump `updated_at`; caller persists afterwards
    pub fn append_message(&self, thread: &mut ChatThread, message: ChatMessage) {
        thread.updated_at = message.timestamp;
        thread.messages.push(message);
    }
}

fn generate_thread_id() -> String {
    format!("t_{}", uuid::Uuid::new_v4().simple())
}
