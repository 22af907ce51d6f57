//! Web search adapters

pub mod ddg;

pub use ddg::DuckDuckGoSearch;
