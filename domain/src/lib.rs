//! Domain layer for colloquy
//!
//! This crate contains the core entities and pure logic of the panel
//! discussion engine. It has no dependencies on infrastructure or
//! presentation concerns — no I/O, no async.
//!
//! # Core Concepts
//!
//! ## Panel
//!
//! A topic is explored by several independent groups of synthetic
//! discussants (agents). Groups run rounds of round-robin turns in
//! parallel and periodically exchange distilled insights.
//!
//! ## Research
//!
//! Agents can invoke a recursive, breadth/depth-bounded web-research
//! pipeline mid-discussion. The entities and response parsing live here;
//! the pipeline itself is an application-layer use case.

pub mod agent;
pub mod core;
pub mod discussion;
pub mod prompt;
pub mod research;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use agent::{Agent, AgentId};
pub use core::{error::DomainError, model::Model};
pub use discussion::{DiscussionGroup, session_id};
pub use prompt::PanelPrompt;
pub use research::{
    ResearchBounds, SearchResult,
    parsing::{ParseError, SerpAnalysis, decode_query_list, parse_query_list, parse_serp_analysis},
    push_unique,
};
pub use session::{
    entities::{Message, Role},
    response::CompletionMessage,
};
pub use tool::{AgentTool, ToolDefinition, ToolInvocation, ToolParseError};
