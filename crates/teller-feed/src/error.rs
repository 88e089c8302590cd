use teller_client::FetchError;
use teller_types::ValidationError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The mutation went through on the server but re-reading the feed did not
    #[error("Operation applied but refreshing the feed failed: {0}")]
    RefreshFailed(FetchError),
}

pub type Result<T> = std::result::Result<T, FeedError>;
