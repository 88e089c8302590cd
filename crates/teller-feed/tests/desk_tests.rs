use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use teller_client::{AccountsApi, FetchError, OperationFeed};
use teller_feed::{AccountDesk, FeedConfig, FeedError, LoadOutcome, OperationRequest};
use teller_types::{AccountSummary, AccountType, Operation, OperationType, Page, ValidationError};

/// Single-account bank kept in memory, newest operation first
struct FakeBank {
    operations: Mutex<Vec<Operation>>,
    balance: Mutex<Decimal>,
    next_id: AtomicI64,
    reject_mutations: AtomicBool,
    fail_fetch_after_mutation: AtomicBool,
    mutated: AtomicBool,
}

impl FakeBank {
    fn with_operations(count: i64) -> Arc<Self> {
        let bank = Arc::new(Self {
            operations: Mutex::new(Vec::new()),
            balance: Mutex::new(Decimal::ZERO),
            next_id: AtomicI64::new(1),
            reject_mutations: AtomicBool::new(false),
            fail_fetch_after_mutation: AtomicBool::new(false),
            mutated: AtomicBool::new(false),
        });
        for _ in 0..count {
            bank.record(OperationType::Credit, Decimal::from(10), None);
        }
        bank
    }

    fn record(&self, op_type: OperationType, amount: Decimal, description: Option<&str>) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let signed = if op_type == OperationType::Credit { amount } else { -amount };
        *self.balance.lock() += signed;
        self.operations.lock().insert(
            0,
            Operation {
                id,
                date: Utc::now(),
                amount,
                op_type,
                description: description.map(str::to_string),
            },
        );
    }

    fn mutate(&self, op_type: OperationType, amount: Decimal, description: Option<&str>) -> Result<(), FetchError> {
        if self.reject_mutations.load(Ordering::SeqCst) {
            return Err(FetchError::Status { status: 400, body: "Balance not sufficient".into() });
        }
        self.record(op_type, amount, description);
        self.mutated.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl OperationFeed for FakeBank {
    async fn fetch_operations(
        &self,
        account_id: &str,
        page_index: u32,
        page_size: u32,
    ) -> Result<Page, FetchError> {
        if self.mutated.load(Ordering::SeqCst) && self.fail_fetch_after_mutation.load(Ordering::SeqCst) {
            return Err(FetchError::Timeout);
        }
        let operations = self.operations.lock();
        let start = (page_index * page_size) as usize;
        let items: Vec<Operation> = operations.iter().skip(start).take(page_size as usize).cloned().collect();
        let total_pages = ((operations.len() as u32) + page_size - 1) / page_size;
        Ok(Page::new(items, page_index, total_pages, page_size)?
            .with_account_id(account_id)
            .with_balance(*self.balance.lock()))
    }
}

#[async_trait]
impl AccountsApi for FakeBank {
    async fn get_account(&self, account_id: &str) -> Result<AccountSummary, FetchError> {
        Ok(AccountSummary {
            id: account_id.to_string(),
            account_type: Some(AccountType::Current),
            balance: Some(*self.balance.lock()),
            created_at: None,
            status: Some("ACTIVATED".into()),
            customer_name: Some("Hassan".into()),
        })
    }

    async fn debit(&self, _account_id: &str, amount: Decimal, description: Option<&str>) -> Result<(), FetchError> {
        self.mutate(OperationType::Debit, amount, description)
    }

    async fn credit(&self, _account_id: &str, amount: Decimal, description: Option<&str>) -> Result<(), FetchError> {
        self.mutate(OperationType::Credit, amount, description)
    }

    async fn transfer(
        &self,
        _source: &str,
        _destination: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<(), FetchError> {
        self.mutate(OperationType::Transfer, amount, description)
    }
}

fn desk(bank: &Arc<FakeBank>) -> AccountDesk {
    let api: Arc<dyn AccountsApi> = bank.clone();
    AccountDesk::new(api, FeedConfig::new().with_initial_page_size(5))
}

#[tokio::test]
async fn test_open_loads_summary_and_first_page() {
    let bank = FakeBank::with_operations(12);
    let mut desk = desk(&bank);

    let outcome = desk.open(" A1 ").await.unwrap();

    assert_eq!(outcome, LoadOutcome::Loaded { appended: 5 });
    assert_eq!(desk.account_id(), Some("A1"));
    assert_eq!(desk.summary().unwrap().balance, Some(Decimal::from(120)));
    assert!(desk.state().has_more);
}

#[tokio::test]
async fn test_submit_resets_feed_to_latest_state() {
    let bank = FakeBank::with_operations(12);
    let mut desk = desk(&bank);
    desk.open("A1").await.unwrap();
    desk.load_more().await.unwrap();
    assert_eq!(desk.operations().len(), 10);

    let request = OperationRequest::debit(Decimal::from(20)).with_description("rent");
    desk.submit(request).await.unwrap();

    let state = desk.state();
    assert_eq!(state.items.len(), 5);
    assert_eq!(state.next_page_to_load, 1);
    assert_eq!(state.items[0].op_type, OperationType::Debit);
    assert_eq!(state.items[0].description.as_deref(), Some("rent"));
    assert_eq!(state.balance, Some(Decimal::from(100)));
    assert_eq!(desk.summary().unwrap().balance, Some(Decimal::from(100)));
}

#[tokio::test]
async fn test_rejected_mutation_leaves_feed_untouched() {
    let bank = FakeBank::with_operations(12);
    let mut desk = desk(&bank);
    desk.open("A1").await.unwrap();
    desk.load_more().await.unwrap();
    let before = desk.state();

    bank.reject_mutations.store(true, Ordering::SeqCst);
    let err = desk.submit(OperationRequest::debit(Decimal::from(5000))).await.unwrap_err();

    assert!(matches!(err, FeedError::Fetch(FetchError::Status { status: 400, .. })));
    assert_eq!(desk.state(), before);
}

#[tokio::test]
async fn test_invalid_request_rejected_before_io() {
    let bank = FakeBank::with_operations(3);
    let mut desk = desk(&bank);
    desk.open("A1").await.unwrap();

    let err = desk.submit(OperationRequest::transfer("A1", Decimal::from(5))).await.unwrap_err();
    assert_eq!(err, FeedError::Validation(ValidationError::SameAccountTransfer("A1".into())));

    let err = desk.submit(OperationRequest::credit(Decimal::ZERO)).await.unwrap_err();
    assert!(matches!(err, FeedError::Validation(ValidationError::AmountTooSmall(_))));
    assert!(!bank.mutated.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_submit_without_open_account() {
    let bank = FakeBank::with_operations(3);
    let mut desk = desk(&bank);

    let err = desk.submit(OperationRequest::credit(Decimal::ONE)).await.unwrap_err();
    assert_eq!(err, FeedError::Validation(ValidationError::EmptyAccountId));
}

#[tokio::test]
async fn test_refresh_failure_after_successful_transfer() {
    let bank = FakeBank::with_operations(3);
    let mut desk = desk(&bank);
    desk.open("A1").await.unwrap();
    bank.fail_fetch_after_mutation.store(true, Ordering::SeqCst);

    let err = desk
        .submit(OperationRequest::transfer("B2", Decimal::from(7)))
        .await
        .unwrap_err();

    assert_eq!(err, FeedError::RefreshFailed(FetchError::Timeout));
    assert!(bank.mutated.load(Ordering::SeqCst));
}
