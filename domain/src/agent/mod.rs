//! Panelist agent entity

pub mod entities;

pub use entities::{Agent, AgentId};
