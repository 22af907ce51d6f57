//! Infrastructure layer for colloquy
//!
//! Adapters for the application-layer ports: the OpenAI-compatible
//! completion provider, the DuckDuckGo Lite scrape search, the HTTP
//! content extractor, the JSONL discussion logger, and the configuration
//! loader.

pub mod config;
pub mod content;
pub mod logging;
pub mod providers;
pub mod search;

pub use config::{ConfigLoader, FileConfig};
pub use content::HttpContentFetcher;
pub use logging::JsonlDiscussionLogger;
pub use providers::OpenAiGateway;
pub use search::DuckDuckGoSearch;
