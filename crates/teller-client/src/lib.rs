pub mod error;
pub mod traits;
pub mod config;
pub mod banking;

pub use error::{FetchError, Result};
pub use traits::{OperationFeed, AccountsApi, ChatApi, ChatAnswer};
pub use config::ClientConfig;
pub use banking::{BankingClient, BankingClientBuilder};
