//! Chat session types: messages and completion responses

pub mod entities;
pub mod response;

pub use entities::{Message, Role};
pub use response::CompletionMessage;
