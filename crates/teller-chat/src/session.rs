use std::sync::Arc;
use teller_client::{ChatApi, FetchError};
use teller_persist::{ChatMessage, ChatThread, PersistError, ThreadStore};

use crate::error::{ChatError, Result};

/// Assistant text recorded when the chat endpoint cannot be reached
pub const ASSISTANT_ERROR_REPLY: &str = "Error contacting assistant.";

/// Outcome of one exchange with the assistant
///
/// Failures are reported here instead of aborting: the reply is always
/// appended to the thread and the in-memory list stays authoritative even
/// when a save fails.
#[derive(Debug)]
pub struct ChatTurn {
    pub thread_id: String,
    /// `None` when nothing was sent, e.g. a thread created without input
    pub reply: Option<ChatMessage>,
    pub fetch_error: Option<FetchError>,
    /// First save failure of the turn
    pub persist_error: Option<PersistError>,
}

impl ChatTurn {
    fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            reply: None,
            fetch_error: None,
            persist_error: None,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.fetch_error.is_none() && self.persist_error.is_none()
    }

    fn record_persist(&mut self, result: std::result::Result<(), PersistError>) {
        if let Err(e) = result {
            self.persist_error.get_or_insert(e);
        }
    }
}

/// Chatbot controller: the thread list, the active thread and the assistant
///
/// Every mutation is flushed to the store immediately.
pub struct ChatSession {
    store: ThreadStore,
    chat: Arc<dyn ChatApi>,
    threads: Vec<ChatThread>,
    active_id: Option<String>,
}

impl ChatSession {
    /// Load persisted threads and select the most recent one
    pub fn open(store: ThreadStore, chat: Arc<dyn ChatApi>) -> Self {
        let threads = store.list_threads();
        let active_id = threads.first().map(|t| t.id.clone());
        tracing::info!(threads = threads.len(), "Chat session opened");

        Self {
            store,
            chat,
            threads,
            active_id,
        }
    }

    pub fn threads(&self) -> &[ChatThread] {
        &self.threads
    }

    pub fn active(&self) -> Option<&ChatThread> {
        let id = self.active_id.as_deref()?;
        self.threads.iter().find(|t| t.id == id)
    }

    pub fn select(&mut self, id: &str) -> Result<&ChatThread> {
        let thread = self
            .threads
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ChatError::UnknownThread(id.to_string()))?;
        self.active_id = Some(thread.id.clone());
        Ok(thread)
    }

    /// Start a thread at the front of the list and make it active
    ///
    /// Non-blank input becomes the first user message and is sent to the
    /// assistant right away.
    pub async fn new_thread(&mut self, input: &str) -> ChatTurn {
        let prompt = input.trim();
        let thread = self.store.new_thread(Some(prompt));
        let mut turn = ChatTurn::new(thread.id.clone());
        tracing::info!(thread_id = %thread.id, "Thread created");

        self.active_id = Some(thread.id.clone());
        self.threads.insert(0, thread);
        turn.record_persist(self.persist());

        if !prompt.is_empty() {
            self.fetch_answer(prompt, &mut turn).await;
        }
        turn
    }

    pub fn delete_thread(&mut self, id: &str) -> Result<()> {
        let remaining = self.store.delete_thread(&self.threads, id);
        if remaining.len() == self.threads.len() {
            return Err(ChatError::UnknownThread(id.to_string()));
        }

        self.threads = remaining;
        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.threads.first().map(|t| t.id.clone());
        }
        tracing::info!(thread_id = %id, "Thread deleted");
        self.persist()?;
        Ok(())
    }

    /// Send `input` on the active thread
    ///
    /// Without an active thread this starts one. Blank input on an existing
    /// thread is ignored and yields `None`.
    pub async fn send(&mut self, input: &str) -> Option<ChatTurn> {
        let Some(thread_id) = self.active_id.clone() else {
            return Some(self.new_thread(input).await);
        };
        let prompt = input.trim();
        if prompt.is_empty() {
            return None;
        }

        let mut turn = ChatTurn::new(thread_id.clone());
        self.append(&thread_id, ChatMessage::user(prompt));
        turn.record_persist(self.persist());

        self.fetch_answer(prompt, &mut turn).await;
        Some(turn)
    }

    // The reply goes to the thread that asked, whichever is active by then.
    async fn fetch_answer(&mut self, prompt: &str, turn: &mut ChatTurn) {
        let reply = match self.chat.ask(prompt).await {
            Ok(answer) => ChatMessage::assistant(answer.answer),
            Err(e) => {
                tracing::warn!(thread_id = %turn.thread_id, "Assistant request failed: {}", e);
                turn.fetch_error = Some(e);
                ChatMessage::assistant(ASSISTANT_ERROR_REPLY)
            }
        };

        self.append(&turn.thread_id, reply.clone());
        turn.reply = Some(reply);
        turn.record_persist(self.persist());
    }

    fn append(&mut self, thread_id: &str, message: ChatMessage) {
        if let Some(thread) = self.threads.iter_mut().find(|t| t.id == thread_id) {
            self.store.append_message(thread, message);
        }
    }

    fn persist(&self) -> std::result::Result<(), PersistError> {
        self.store.save_threads(&self.threads).map_err(|e| {
            tracing::warn!(count = self.threads.len(), "Failed to persist threads: {}", e);
            e
        })
    }
}
