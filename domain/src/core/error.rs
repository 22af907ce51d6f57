//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("No agents configured for the panel")]
    NoAgents,

    #[error("No groups created. Split the agents into subgroups first")]
    NoGroups,

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Invalid panel parameters: {0}")]
    InvalidParameters(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DomainError::NoAgents;
        assert_eq!(error.to_string(), "No agents configured for the panel");

        let error = DomainError::InvalidTopic("empty".to_string());
        assert_eq!(error.to_string(), "Invalid topic: empty");
    }
}
