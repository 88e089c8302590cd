use serde::{Deserialize, Serialize};

/// Page sizes for the account feed
///
/// `initial_page_size` is deliberately large so one round trip fills a
/// scroll region; `max_page_size` bounds whatever callers ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_initial_page_size")]
    pub initial_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

fn default_initial_page_size() -> u32 {
    200
}

fn default_max_page_size() -> u32 {
    500
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            initial_page_size: default_initial_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl FeedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_page_size(mut self, size: u32) -> Self {
        self.initial_page_size = size;
        self
    }

    pub fn with_max_page_size(mut self, size: u32) -> Self {
        self.max_page_size = size;
        self
    }
}
