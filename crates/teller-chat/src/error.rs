use teller_persist::PersistError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Unknown thread: {0}")]
    UnknownThread(String),

    #[error("Failed to persist threads: {0}")]
    Persist(#[from] PersistError),
}

pub type Result<T> = std::result::Result<T, ChatError>;
