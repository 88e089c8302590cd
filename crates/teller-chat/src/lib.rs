pub mod error;
pub mod session;

pub use error::{ChatError, Result};
pub use session::{ChatSession, ChatTurn, ASSISTANT_ERROR_REPLY};
