// HTTP client for the banking REST backend and its chat endpoint

use crate::config::ClientConfig;
use crate::error::{FetchError, Result};
use crate::traits::{AccountsApi, ChatAnswer, ChatApi, OperationFeed};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use teller_types::{AccountHistoryDto, AccountSummary, BankAccountDto, Page};

/// Banking backend client (plain HTTP + JSON)
///
/// One instance serves both the accounts API and the chat endpoint, which may
/// live on a different host.
#[derive(Debug, Clone)]
pub struct BankingClient {
    http_client: reqwest::Client,
    base_url: Url,
    chat_base_url: Url,
}

impl BankingClient {
    pub fn builder() -> BankingClientBuilder {
        BankingClientBuilder::default()
    }

    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        let mut builder = Self::builder()
            .base_url(&config.base_url)
            .chat_base_url(config.chat_url())
            .timeout(config.timeout());
        if let Some(token) = &config.bearer_token {
            builder = builder.bearer_token(token);
        }
        builder.build()
    }

    /// `base` with each segment appended percent-encoded, so ids cannot
    /// change the route
    fn url(base: &Url, segments: &[&str]) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("Cannot build a path on {}", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn api_url(&self, segments: &[&str]) -> Result<Url> {
        Self::url(&self.base_url, segments)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        let response = self.http_client.get(url).query(query).send().await?;
        Self::decode(response).await
    }

    /// POST with query parameters and no body, as the account mutations expect
    async fn post_query(&self, url: Url, query: &[(&str, String)]) -> Result<()> {
        let response = self.http_client.post(url).query(query).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn post_json<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<reqwest::Response> {
        let response = self.http_client.post(url).json(body).send().await?;
        Self::check_status(response).await
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[derive(Serialize)]
struct ChatBody<'a> {
    message: &'a str,
}

/// Builder for BankingClient
#[derive(Default)]
pub struct BankingClientBuilder {
    base_url: Option<String>,
    chat_base_url: Option<String>,
    bearer_token: Option<String>,
    timeout: Option<Duration>,
}

impl BankingClientBuilder {
    /// Accounts API root, e.g. "http://localhost:8085"
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn chat_base_url(mut self, url: impl Into<String>) -> Self {
        self.chat_base_url = Some(url.into());
        self
    }

    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> anyhow::Result<BankingClient> {
        let base_url = self.base_url.context("Base URL is required")?;
        if base_url.trim().is_empty() {
            anyhow::bail!("Base URL is required");
        }
        let base_url = parse_base(&base_url).context("Invalid base URL")?;
        let chat_base_url = match self.chat_base_url {
            Some(url) => parse_base(&url).context("Invalid chat base URL")?,
            None => base_url.clone(),
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = self.bearer_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .context("Invalid bearer token format")?,
            );
        }

        let mut http = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http_client = http.build().context("Failed to create HTTP client")?;

        Ok(BankingClient {
            http_client,
            base_url,
            chat_base_url,
        })
    }
}

fn parse_base(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        anyhow::bail!("{} cannot carry a path", raw);
    }
    Ok(url)
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

#[async_trait]
impl OperationFeed for BankingClient {
    async fn fetch_operations(
        &self,
        account_id: &str,
        page_index: u32,
        page_size: u32,
    ) -> Result<Page> {
        tracing::debug!(account_id, page_index, page_size, "Fetching operations page");

        let url = self.api_url(&["accounts", account_id, "pageOperations"])?;
        let dto: AccountHistoryDto = self
            .get_json(
                url,
                &[("page", page_index.to_string()), ("size", page_size.to_string())],
            )
            .await?;

        Ok(Page::try_from(dto)?)
    }
}

#[async_trait]
impl AccountsApi for BankingClient {
    async fn get_account(&self, account_id: &str) -> Result<AccountSummary> {
        let url = self.api_url(&["accounts", account_id])?;
        let dto: BankAccountDto = self.get_json(url, &[]).await?;
        Ok(AccountSummary::try_from(dto)?)
    }

    async fn debit(
        &self,
        account_id: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<()> {
        let url = self.api_url(&["accounts", "debit", account_id])?;
        self.post_query(url, &movement_query(amount, description)).await
    }

    async fn credit(
        &self,
        account_id: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<()> {
        let url = self.api_url(&["accounts", "credit", account_id])?;
        self.post_query(url, &movement_query(amount, description)).await
    }

    // The backend records no description on transfers.
    async fn transfer(
        &self,
        source: &str,
        destination: &str,
        amount: Decimal,
        _description: Option<&str>,
    ) -> Result<()> {
        let url = self.api_url(&["accounts", "transfer"])?;
        let query = [
            ("from", source.to_string()),
            ("to", destination.to_string()),
            ("amount", amount.to_string()),
        ];
        self.post_query(url, &query).await
    }
}

/// `desc` is a required parameter on the backend, so absent means empty
fn movement_query(amount: Decimal, description: Option<&str>) -> [(&'static str, String); 2] {
    [
        ("amount", amount.to_string()),
        ("desc", description.unwrap_or_default().to_string()),
    ]
}

#[async_trait]
impl ChatApi for BankingClient {
    async fn ask(&self, message: &str) -> Result<ChatAnswer> {
        let url = Self::url(&self.chat_base_url, &["ai", "chat"])?;
        let response = self.post_json(url, &ChatBody { message }).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
