use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::operation::{Operation, OperationDto};

/// One fetch result of the paginated operation feed
///
/// Only constructed through `Page::new` or from an `AccountHistoryDto`, both of
/// which guarantee `page_size > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Operation>,
    pub page_index: u32,
    pub total_pages: u32,
    pub page_size: u32,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub balance: Option<Decimal>,
}

impl Page {
    pub fn new(
        items: Vec<Operation>,
        page_index: u32,
        total_pages: u32,
        page_size: u32,
    ) -> Result<Self, ValidationError> {
        if page_size == 0 {
            return Err(ValidationError::InvalidPage("page size must be positive".to_string()));
        }
        Ok(Self {
            items,
            page_index,
            total_pages,
            page_size,
            account_id: None,
            balance: None,
        })
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn is_last(&self) -> bool {
        self.page_index.saturating_add(1) >= self.total_pages
    }
}

/// Account history page as returned by `/accounts/{id}/pageOperations`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountHistoryDto {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub balance: Option<Decimal>,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default, rename = "accountOperationDTOS", alias = "accountOperations")]
    pub operations: Option<Vec<OperationDto>>,
}

impl TryFrom<AccountHistoryDto> for Page {
    type Error = ValidationError;

    fn try_from(dto: AccountHistoryDto) -> Result<Self, Self::Error> {
        let items = dto
            .operations
            .unwrap_or_default()
            .into_iter()
            .map(Operation::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut page = Page::new(items, dto.current_page, dto.total_pages, dto.page_size)?;
        page.account_id = dto.account_id;
        page.balance = dto.balance;
        Ok(page)
    }
}
