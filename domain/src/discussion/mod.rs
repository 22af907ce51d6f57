//! Discussion group entity and session identity

pub mod entities;

pub use entities::{DiscussionGroup, session_id};
