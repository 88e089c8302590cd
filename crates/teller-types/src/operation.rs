use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    Debit,
    Credit,
    Transfer,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Debit => "DEBIT",
            OperationType::Credit => "CREDIT",
            OperationType::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBIT" => Ok(OperationType::Debit),
            "CREDIT" => Ok(OperationType::Credit),
            "TRANSFER" => Ok(OperationType::Transfer),
            _ => Err(ValidationError::UnknownOperationType(s.to_string())),
        }
    }
}

/// One account operation as seen by the core
///
/// Immutable once received; `id` is unique within an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub op_type: OperationType,
    pub description: Option<String>,
}

/// Operation as sent by the banking backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDto {
    pub id: i64,
    pub operation_date: WireDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type", alias = "operationType")]
    pub op_type: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Backend dates arrive either as epoch milliseconds or as ISO-8601 text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireDate {
    Millis(i64),
    Text(String),
}

impl WireDate {
    pub fn to_utc(&self) -> Result<DateTime<Utc>, ValidationError> {
        match self {
            WireDate::Millis(ms) => Utc
                .timestamp_millis_opt(*ms)
                .single()
                .ok_or_else(|| ValidationError::InvalidDate(ms.to_string())),
            WireDate::Text(text) => {
                if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                    return Ok(dt.with_timezone(&Utc));
                }
                // Offset-less timestamps are taken as UTC
                NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|naive| naive.and_utc())
                    .map_err(|_| ValidationError::InvalidDate(text.clone()))
            }
        }
    }
}

impl TryFrom<OperationDto> for Operation {
    type Error = ValidationError;

    fn try_from(dto: OperationDto) -> Result<Self, Self::Error> {
        let description = dto
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Operation {
            id: dto.id,
            date: dto.operation_date.to_utc()?,
            amount: dto.amount,
            op_type: dto.op_type.parse()?,
            description,
        })
    }
}
