use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use teller_types::{AccountSummary, Page};

use crate::error::Result;

/// Source of the paginated operation feed
///
/// Implementations return one validated `Page` per call and never retry.
#[async_trait]
pub trait OperationFeed: Send + Sync {
    async fn fetch_operations(
        &self,
        account_id: &str,
        page_index: u32,
        page_size: u32,
    ) -> Result<Page>;
}

/// Account endpoints used by the account-detail screen
///
/// Mutations return nothing useful: callers re-read the feed afterwards.
#[async_trait]
pub trait AccountsApi: OperationFeed {
    async fn get_account(&self, account_id: &str) -> Result<AccountSummary>;

    async fn debit(
        &self,
        account_id: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<()>;

    async fn credit(
        &self,
        account_id: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<()>;

    async fn transfer(
        &self,
        source: &str,
        destination: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<()>;
}

/// Request/response chat assistant
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn ask(&self, message: &str) -> Result<ChatAnswer>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAnswer {
    #[serde(default)]
    pub answer: String,
}

impl ChatAnswer {
    pub fn new(answer: impl Into<String>) -> Self {
        Self { answer: answer.into() }
    }
}
