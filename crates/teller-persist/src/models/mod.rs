mod chat_message;
mod chat_thread;

pub use chat_message::ChatMessage;
pub use chat_thread::{ChatThread, DEFAULT_THREAD_TITLE};

use chrono::{DateTime, SubsecRound, Utc};

/// Current instant at the millisecond precision the storage format keeps
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
