pub mod error;
pub mod config;
pub mod aggregator;
pub mod desk;

pub use error::FeedError;
pub use config::FeedConfig;
pub use aggregator::{PagedFeedAggregator, FeedState, LoadOutcome, SkipReason};
pub use desk::{AccountDesk, OperationRequest};
