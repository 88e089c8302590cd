use rust_decimal::Decimal;
use std::sync::Arc;
use teller_client::AccountsApi;
use teller_types::{normalize_account_id, AccountSummary, Operation, OperationType, ValidationError};

use crate::aggregator::{FeedState, LoadOutcome, PagedFeedAggregator};
use crate::config::FeedConfig;
use crate::error::{FeedError, Result};

/// A debit, credit or transfer requested against the open account
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    pub op_type: OperationType,
    pub amount: Decimal,
    pub description: Option<String>,
    /// Only meaningful for transfers
    pub destination: Option<String>,
}

impl OperationRequest {
    pub fn debit(amount: Decimal) -> Self {
        Self {
            op_type: OperationType::Debit,
            amount,
            description: None,
            destination: None,
        }
    }

    pub fn credit(amount: Decimal) -> Self {
        Self {
            op_type: OperationType::Credit,
            ..Self::debit(amount)
        }
    }

    pub fn transfer(destination: impl Into<String>, amount: Decimal) -> Self {
        Self {
            op_type: OperationType::Transfer,
            destination: Some(destination.into()),
            ..Self::debit(amount)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        let trimmed = description.trim();
        self.description = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Check against `source`; returns the trimmed destination for transfers
    pub fn validate(&self, source: &str) -> std::result::Result<Option<String>, ValidationError> {
        let minimum = Decimal::new(1, 2);
        if self.amount < minimum {
            return Err(ValidationError::AmountTooSmall(self.amount));
        }
        if self.op_type != OperationType::Transfer {
            return Ok(None);
        }
        let destination = self
            .destination
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or(ValidationError::MissingDestination)?;
        if destination == source {
            return Err(ValidationError::SameAccountTransfer(source.to_string()));
        }
        Ok(Some(destination.to_string()))
    }
}

/// Account-detail controller: one account summary plus its operation feed
pub struct AccountDesk {
    api: Arc<dyn AccountsApi>,
    feed: PagedFeedAggregator<dyn AccountsApi>,
    config: FeedConfig,
    account_id: Option<String>,
    summary: Option<AccountSummary>,
}

impl AccountDesk {
    pub fn new(api: Arc<dyn AccountsApi>, config: FeedConfig) -> Self {
        let feed = PagedFeedAggregator::new(api.clone(), config.max_page_size);
        Self {
            api,
            feed,
            config,
            account_id: None,
            summary: None,
        }
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn summary(&self) -> Option<&AccountSummary> {
        self.summary.as_ref()
    }

    pub fn feed(&self) -> &PagedFeedAggregator<dyn AccountsApi> {
        &self.feed
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.feed.items()
    }

    pub fn state(&self) -> FeedState {
        self.feed.snapshot()
    }

    /// Switch to `account_id`: fetch its summary and restart the feed
    ///
    /// A summary failure is logged and leaves the summary empty; the feed
    /// result is returned as is.
    pub async fn open(&mut self, account_id: &str) -> Result<LoadOutcome> {
        let account_id = normalize_account_id(account_id)?;
        tracing::info!(%account_id, "Opening account");

        self.account_id = Some(account_id.clone());
        self.summary = None;
        self.refresh_summary().await;

        self.feed.reset(&account_id, self.config.initial_page_size).await
    }

    pub async fn load_more(&self) -> Result<LoadOutcome> {
        self.feed.load_more().await
    }

    /// Apply a mutation, then reload summary and feed from page 0
    pub async fn submit(&mut self, request: OperationRequest) -> Result<LoadOutcome> {
        let account_id = self
            .account_id
            .clone()
            .ok_or(ValidationError::EmptyAccountId)?;
        let destination = request.validate(&account_id)?;
        let description = request.description.as_deref();

        tracing::info!(
            %account_id,
            op_type = %request.op_type,
            amount = %request.amount,
            "Submitting operation"
        );

        match request.op_type {
            OperationType::Debit => {
                self.api.debit(&account_id, request.amount, description).await?
            }
            OperationType::Credit => {
                self.api.credit(&account_id, request.amount, description).await?
            }
            OperationType::Transfer => {
                let destination = destination.ok_or(ValidationError::MissingDestination)?;
                self.api
                    .transfer(&account_id, &destination, request.amount, description)
                    .await?
            }
        }

        self.refresh_summary().await;
        self.feed
            .reset(&account_id, self.config.initial_page_size)
            .await
            .map_err(|e| match e {
                FeedError::Fetch(fetch) => FeedError::RefreshFailed(fetch),
                other => other,
            })
    }

    async fn refresh_summary(&mut self) {
        let Some(account_id) = self.account_id.clone() else {
            return;
        };
        match self.api.get_account(&account_id).await {
            Ok(summary) => self.summary = Some(summary),
            Err(e) => tracing::warn!(%account_id, "Failed to load account summary: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_minimum() {
        let request = OperationRequest::debit(Decimal::new(5, 3));
        assert_eq!(
            request.validate("A1"),
            Err(ValidationError::AmountTooSmall(Decimal::new(5, 3)))
        );
        assert!(OperationRequest::credit(Decimal::new(1, 2)).validate("A1").is_ok());
    }

    #[test]
    fn test_transfer_destination_rules() {
        let missing = OperationRequest {
            destination: Some("   ".into()),
            ..OperationRequest::transfer("x", Decimal::from(10))
        };
        assert_eq!(missing.validate("A1"), Err(ValidationError::MissingDestination));

        let same = OperationRequest::transfer(" A1 ", Decimal::from(10));
        assert_eq!(same.validate("A1"), Err(ValidationError::SameAccountTransfer("A1".into())));

        let ok = OperationRequest::transfer(" B2", Decimal::from(10));
        assert_eq!(ok.validate("A1"), Ok(Some("B2".to_string())));
    }

    #[test]
    fn test_blank_description_dropped() {
        let request = OperationRequest::debit(Decimal::ONE).with_description("   ");
        assert_eq!(request.description, None);
        let request = OperationRequest::debit(Decimal::ONE).with_description(" rent ");
        assert_eq!(request.description.as_deref(), Some("rent"));
    }
}
