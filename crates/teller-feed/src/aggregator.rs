use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;
use teller_client::OperationFeed;
use teller_types::{normalize_account_id, Operation, Page, ValidationError};

use crate::error::Result;

/// Client-side view of the operation feed accumulated so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    /// Server order within and across pages; append-only between resets
    pub items: Vec<Operation>,
    pub next_page_to_load: u32,
    pub has_more: bool,
    /// True for exactly the duration of one outstanding `load_more`
    pub is_loading_more: bool,
    /// A first page is being fetched; the feed cannot be extended until it lands
    pub is_loading_initial: bool,
    pub account_id: Option<String>,
    pub page_size: u32,
    /// Balance reported alongside the most recent page
    pub balance: Option<Decimal>,
    /// Bumped by every `load_initial` and `reset`
    pub generation: u64,
    seen_ids: HashSet<i64>,
}

impl FeedState {
    fn clear(&mut self) {
        self.items.clear();
        self.seen_ids.clear();
        self.next_page_to_load = 0;
        self.has_more = false;
        self.is_loading_more = false;
        self.is_loading_initial = false;
    }

    fn replace_with(&mut self, account_id: String, page_size: u32, page: Page) -> usize {
        self.clear();
        self.account_id = Some(account_id);
        self.page_size = page_size;
        self.next_page_to_load = 1;
        self.has_more = page.total_pages > 1;
        if page.balance.is_some() {
            self.balance = page.balance;
        }
        self.append(page.items)
    }

    /// Appends in arrival order, skipping ids already in the feed
    fn append(&mut self, items: Vec<Operation>) -> usize {
        let before = self.items.len();
        for op in items {
            if self.seen_ids.insert(op.id) {
                self.items.push(op);
            } else {
                tracing::debug!(operation_id = op.id, "Skipping operation already in feed");
            }
        }
        self.items.len() - before
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A `load_more` or a first-page load is already outstanding
    InFlight,
    /// Every page has been loaded
    Exhausted,
    /// No successful `load_initial` yet
    NotLoaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { appended: usize },
    Skipped(SkipReason),
    /// A newer `load_initial`/`reset` started while this fetch was in flight;
    /// its result was discarded
    Superseded,
}

/// Infinite-scroll aggregator over a paginated operation feed
///
/// All methods take `&self`. The state lock is released before every fetch,
/// so overlapping calls on one task (e.g. via `tokio::join!`) see each
/// other's flags: a second `load_more` while one is outstanding is a no-op,
/// and a `reset` makes any outstanding fetch stale.
pub struct PagedFeedAggregator<F: OperationFeed + ?Sized = dyn OperationFeed> {
    source: Arc<F>,
    max_page_size: u32,
    state: Mutex<FeedState>,
}

impl<F: OperationFeed + ?Sized> PagedFeedAggregator<F> {
    pub fn new(source: Arc<F>, max_page_size: u32) -> Self {
        Self {
            source,
            max_page_size,
            state: Mutex::new(FeedState::default()),
        }
    }

    pub fn snapshot(&self) -> FeedState {
        self.state.lock().clone()
    }

    pub fn items(&self) -> Vec<Operation> {
        self.state.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    pub fn has_more(&self) -> bool {
        self.state.lock().has_more
    }

    pub fn is_loading_more(&self) -> bool {
        self.state.lock().is_loading_more
    }

    pub fn next_page_to_load(&self) -> u32 {
        self.state.lock().next_page_to_load
    }

    pub fn account_id(&self) -> Option<String> {
        self.state.lock().account_id.clone()
    }

    fn validate(&self, account_id: &str, page_size: u32) -> std::result::Result<String, ValidationError> {
        let account_id = normalize_account_id(account_id)?;
        if page_size == 0 || page_size > self.max_page_size {
            return Err(ValidationError::PageSizeOutOfRange {
                size: page_size,
                max: self.max_page_size,
            });
        }
        Ok(account_id)
    }

    /// Fetch page 0 and replace the feed with it
    ///
    /// Until the page arrives `load_more` is skipped as in flight. On failure
    /// the items, cursor and account are left as they were.
    pub async fn load_initial(&self, account_id: &str, page_size: u32) -> Result<LoadOutcome> {
        let account_id = self.validate(account_id, page_size)?;

        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.is_loading_more = false;
            state.is_loading_initial = true;
            state.generation
        };

        tracing::debug!(%account_id, page_size, generation, "Loading first page");
        let result = self.source.fetch_operations(&account_id, 0, page_size).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::debug!(%account_id, generation, "Discarding superseded first page");
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(page) => {
                let appended = state.replace_with(account_id, page_size, page);
                tracing::debug!(appended, has_more = state.has_more, "First page loaded");
                Ok(LoadOutcome::Loaded { appended })
            }
            Err(e) => {
                state.is_loading_initial = false;
                tracing::warn!(%account_id, "Failed to load first page: {}", e);
                Err(e.into())
            }
        }
    }

    /// Fetch the next page and append it
    ///
    /// Returns `Skipped` without fetching while another `load_more` is
    /// outstanding or when nothing is left. A failed fetch leaves `items` and
    /// `next_page_to_load` untouched.
    pub async fn load_more(&self) -> Result<LoadOutcome> {
        let (account_id, page_index, page_size, generation) = {
            let mut state = self.state.lock();
            if state.is_loading_more || state.is_loading_initial {
                return Ok(LoadOutcome::Skipped(SkipReason::InFlight));
            }
            let Some(account_id) = state.account_id.clone() else {
                return Ok(LoadOutcome::Skipped(SkipReason::NotLoaded));
            };
            if !state.has_more {
                return Ok(LoadOutcome::Skipped(SkipReason::Exhausted));
            }
            state.is_loading_more = true;
            (account_id, state.next_page_to_load, state.page_size, state.generation)
        };

        tracing::debug!(%account_id, page_index, page_size, "Loading more operations");
        let result = self
            .source
            .fetch_operations(&account_id, page_index, page_size)
            .await;

        let mut state = self.state.lock();
        if state.generation != generation {
            // The newer generation owns the flag now
            tracing::debug!(%account_id, page_index, "Discarding stale page");
            return Ok(LoadOutcome::Superseded);
        }
        state.is_loading_more = false;

        match result {
            Ok(page) => {
                let appended = state.append(page.items);
                state.next_page_to_load += 1;
                state.has_more = page.total_pages > state.next_page_to_load;
                if page.balance.is_some() {
                    state.balance = page.balance;
                }
                tracing::debug!(appended, has_more = state.has_more, "Page appended");
                Ok(LoadOutcome::Loaded { appended })
            }
            Err(e) => {
                tracing::warn!(%account_id, page_index, "Failed to load more operations: {}", e);
                Err(e.into())
            }
        }
    }

    /// Clear the feed and load page 0 again
    ///
    /// Used when the viewed account changes and after every successful
    /// mutation. Any fetch still in flight becomes stale.
    pub async fn reset(&self, account_id: &str, page_size: u32) -> Result<LoadOutcome> {
        self.validate(account_id, page_size)?;
        {
            let mut state = self.state.lock();
            state.clear();
            state.generation += 1;
        }
        self.load_initial(account_id, page_size).await
    }
}
