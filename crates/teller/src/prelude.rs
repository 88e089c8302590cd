//! Prelude module for convenient imports
//!
//! ```rust
//! use teller::prelude::*;
//! ```

pub use crate::{
    AccountDesk, FeedConfig, LoadOutcome, OperationRequest, PagedFeedAggregator,
    AccountsApi, BankingClient, ChatApi, OperationFeed,
    ChatSession, ChatTurn, ThreadStore, ThreadStoreBuilder,
    Operation, OperationType, Page,
    Decimal,
};
