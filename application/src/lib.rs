//! Application layer for colloquy
//!
//! This crate contains the orchestration engine: port definitions, the
//! rate-aware invocation gateway, and the use cases that schedule turns,
//! synchronize groups, and run recursive research. It depends only on the
//! domain layer.

pub mod gateway;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use gateway::throttled::{RetryPolicy, ThrottledGateway};
pub use ports::{
    completion_gateway::{ChatOptions, CompletionGateway, GatewayError, ToolChoice},
    content::ContentFetcher,
    discussion_logger::{DiscussionEvent, DiscussionEventKind, DiscussionLogger, NoDiscussionLogger},
    search::{SearchError, SearchProvider, SearchQuery},
};
pub use use_cases::deep_research::{DeepResearch, ResearchOutcome};
pub use use_cases::personas::generate_personas;
pub use use_cases::run_panel::{PanelNetwork, RunPanelError, build_groups};
pub use use_cases::run_round::GroupSession;
pub use use_cases::shared::PanelDeps;
