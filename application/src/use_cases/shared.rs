//! Shared dependency bundle for the panel use cases

use crate::ports::completion_gateway::CompletionGateway;
use crate::ports::content::ContentFetcher;
use crate::ports::discussion_logger::DiscussionLogger;
use crate::ports::search::SearchProvider;
use colloquy_domain::{Message, Model, Role};
use std::sync::Arc;

/// The collaborators every panel use case needs, injected once at
/// construction and cloned into group tasks (all members are `Arc`s).
#[derive(Clone)]
pub struct PanelDeps {
    pub gateway: Arc<dyn CompletionGateway>,
    pub search: Arc<dyn SearchProvider>,
    pub fetcher: Arc<dyn ContentFetcher>,
    pub logger: Arc<dyn DiscussionLogger>,
}

impl PanelDeps {
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn ContentFetcher>,
        logger: Arc<dyn DiscussionLogger>,
    ) -> Self {
        Self {
            gateway,
            search,
            fetcher,
            logger,
        }
    }
}

/// An instruction message with the system role, downgraded to the user role
/// for models that reject system prompts.
pub fn instruction_message(model: &Model, content: impl Into<String>) -> Message {
    let role = if model.accepts_system_role() {
        Role::System
    } else {
        Role::User
    };
    Message {
        role,
        content: content.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_role_follows_model() {
        assert_eq!(
            instruction_message(&Model::Gpt4oMini, "p").role,
            Role::System
        );
        assert_eq!(instruction_message(&Model::O1, "p").role, Role::User);
    }
}
