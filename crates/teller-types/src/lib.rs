pub mod error;
pub mod operation;
pub mod page;
pub mod account;
pub mod chat;

pub use error::{ValidationError, normalize_account_id};
pub use operation::{Operation, OperationType, OperationDto, WireDate};
pub use page::{Page, AccountHistoryDto};
pub use account::{AccountSummary, AccountType, BankAccountDto, CustomerRef};
pub use chat::ChatRole;
