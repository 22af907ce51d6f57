//! Use cases: the orchestration engine proper

pub mod agent_reply;
pub mod deep_research;
pub mod personas;
pub mod run_panel;
pub mod run_round;
pub mod shared;
