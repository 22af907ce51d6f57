//! Page content extraction

pub mod extractor;

pub use extractor::HttpContentFetcher;
