//! # Teller
//!
//! Client-side core of a banking front-end: an infinite-scroll view over an
//! account's paginated operation history, and a set of assistant chat
//! threads persisted in local storage.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use teller::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Arc::new(
//!         BankingClient::builder()
//!             .base_url("http://localhost:8085")
//!             .build()?,
//!     );
//!
//!     // Operation feed, 200 operations on the first round trip
//!     let mut desk = AccountDesk::new(client.clone(), FeedConfig::default());
//!     desk.open("A1").await?;
//!     while desk.state().has_more {
//!         desk.load_more().await?;
//!     }
//!     desk.submit(OperationRequest::debit(Decimal::new(2500, 2)).with_description("rent"))
//!         .await?;
//!
//!     // Assistant threads, kept under ~/.teller/storage
//!     let store = ThreadStoreBuilder::new().build()?;
//!     let mut chat = ChatSession::open(store, client);
//!     if let Some(turn) = chat.send("What was my last debit?").await {
//!         println!("{:?}", turn.reply);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`teller-types`**: operations, pages, account summaries and their wire DTOs
//! - **`teller-client`**: collaborator traits and the HTTP client
//! - **`teller-feed`**: `PagedFeedAggregator` and the `AccountDesk` controller
//! - **`teller-persist`**: key-value stores and the `ThreadStore`
//! - **`teller-chat`**: `ChatSession`, threads plus the assistant endpoint

pub mod prelude;

pub use teller_types::{
    AccountSummary, AccountType, ChatRole, Operation, OperationType, Page, ValidationError,
};

pub use teller_client::{
    AccountsApi, BankingClient, BankingClientBuilder, ChatAnswer, ChatApi, ClientConfig,
    FetchError, OperationFeed,
};

pub use teller_feed::{
    AccountDesk, FeedConfig, FeedError, FeedState, LoadOutcome, OperationRequest,
    PagedFeedAggregator, SkipReason,
};

pub use teller_persist::{
    ChatMessage, ChatThread, FileStore, KeyValueStore, MemoryStore, PersistError, StorageConfig,
    ThreadStore, ThreadStoreBuilder,
};

pub use teller_chat::{ChatError, ChatSession, ChatTurn};

pub use rust_decimal::Decimal;
