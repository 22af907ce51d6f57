//! Web search port

use async_trait::async_trait;
use colloquy_domain::SearchResult;
use thiserror::Error;

/// Errors from a search provider
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Keywords are mandatory")]
    EmptyQuery,
}

/// Parameters for one search call
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub keywords: String,
    /// Region code, e.g. `wt-wt` for no region.
    pub region: String,
    pub safesearch: String,
    /// Time limit filter, e.g. `d`, `w`, `m`.
    pub timelimit: Option<String>,
    pub max_results: Option<usize>,
}

impl SearchQuery {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            region: "wt-wt".to_string(),
            safesearch: "moderate".to_string(),
            timelimit: None,
            max_results: None,
        }
    }

    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }
}

/// Web search provider returning ordered, href-deduplicated result snippets.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn text(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SearchError>;
}
