//! Port definitions (interfaces to the outside world)

pub mod completion_gateway;
pub mod content;
pub mod discussion_logger;
pub mod search;
