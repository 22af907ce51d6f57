//! Core domain types shared across modules

pub mod error;
pub mod model;

pub use error::DomainError;
pub use model::Model;
