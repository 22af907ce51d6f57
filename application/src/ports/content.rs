//! Content extraction port

use async_trait::async_trait;

/// Fetches the textual content of a URL.
///
/// Treated as an opaque external dependency: failures must not raise, only
/// return `None`, so a dead link never aborts a research branch.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<String>;
}
