use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::operation::WireDate;

/// Account kind, normalised from the loose strings the backend emits
/// (`"SavingAccount"`, `"SAVING"`, `"CurrentBankAccountDTO"`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Saving,
    Current,
    Other(String),
}

impl AccountType {
    pub fn normalize(raw: &str) -> Self {
        let upper = raw.to_uppercase();
        if upper.contains("SAV") {
            AccountType::Saving
        } else if upper.contains("CURRENT") {
            AccountType::Current
        } else {
            AccountType::Other(upper)
        }
    }

    /// Canonical upper-case code (`SAVING`, `CURRENT`, or the raw value upper-cased)
    pub fn code(&self) -> &str {
        match self {
            AccountType::Saving => "SAVING",
            AccountType::Current => "CURRENT",
            AccountType::Other(raw) => raw,
        }
    }

    /// Human label; `None` renders as `Unknown`
    pub fn label(kind: Option<&AccountType>) -> String {
        match kind {
            Some(AccountType::Saving) => "Saving".to_string(),
            Some(AccountType::Current) => "Current".to_string(),
            Some(AccountType::Other(raw)) => raw.clone(),
            None => "Unknown".to_string(),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: String,
    pub account_type: Option<AccountType>,
    pub balance: Option<Decimal>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub status: Option<String>,
    pub customer_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Bank account as returned by `/accounts/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default, rename = "type")]
    pub account_type: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub balance: Option<Decimal>,
    #[serde(default)]
    pub created_at: Option<WireDate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "customerDTO")]
    pub customer: Option<CustomerRef>,
}

impl TryFrom<BankAccountDto> for AccountSummary {
    type Error = ValidationError;

    fn try_from(dto: BankAccountDto) -> Result<Self, Self::Error> {
        let id = dto
            .id
            .or(dto.account_id)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::EmptyAccountId)?;

        let created_at = match dto.created_at {
            Some(date) => Some(date.to_utc()?),
            None => None,
        };

        Ok(AccountSummary {
            id,
            account_type: dto.account_type.as_deref().map(AccountType::normalize),
            balance: dto.balance,
            created_at,
            status: dto.status,
            customer_name: dto.customer.and_then(|c| c.name),
        })
    }
}
