use rust_decimal::Decimal;
use thiserror::Error;

/// Caller input or boundary payload rejected before it reaches the core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Account id must not be empty")]
    EmptyAccountId,

    #[error("Page size {size} out of range (1..={max})")]
    PageSizeOutOfRange { size: u32, max: u32 },

    #[error("Unknown operation type: {0}")]
    UnknownOperationType(String),

    #[error("Invalid operation date: {0}")]
    InvalidDate(String),

    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("Amount {0} is below the minimum of 0.01")]
    AmountTooSmall(Decimal),

    #[error("Transfer requires a destination account")]
    MissingDestination,

    #[error("Transfer source and destination are the same account: {0}")]
    SameAccountTransfer(String),
}

/// Trimmed account id, or `EmptyAccountId` when nothing is left
pub fn normalize_account_id(account_id: &str) -> Result<String, ValidationError> {
    let trimmed = account_id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyAccountId);
    }
    Ok(trimmed.to_string())
}
