//! Persona generation for panel members.
//!
//! Asks the model for distinct persona prompts so each panelist brings a
//! different perspective to the topic. Degrades to the default panelist
//! persona for every agent when generation fails or under-delivers.

use crate::ports::completion_gateway::ChatOptions;
use crate::use_cases::shared::PanelDeps;
use colloquy_domain::{Message, Model, PanelPrompt, parse_query_list};
use tracing::warn;

/// Generate `count` persona prompts for a panel on `topic`.
///
/// Always returns exactly `count` entries.
pub async fn generate_personas(
    deps: &PanelDeps,
    model: &Model,
    topic: &str,
    count: usize,
) -> Vec<String> {
    let messages = [Message::user(PanelPrompt::personas(topic, count))];
    let mut personas = match deps
        .gateway
        .complete(model, &messages, &ChatOptions::json())
        .await
    {
        Ok(completion) => parse_query_list(&completion.content_or_default(), count),
        Err(e) => {
            warn!(error = %e, "Persona generation failed, using the default persona");
            Vec::new()
        }
    };
    personas.resize(count, PanelPrompt::default_persona().to_string());
    personas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::completion_gateway::{CompletionGateway, GatewayError};
    use crate::ports::content::ContentFetcher;
    use crate::ports::discussion_logger::NoDiscussionLogger;
    use crate::ports::search::{SearchError, SearchProvider, SearchQuery};
    use async_trait::async_trait;
    use colloquy_domain::{CompletionMessage, SearchResult};
    use std::sync::Arc;

    struct PersonaGateway;

    #[async_trait]
    impl CompletionGateway for PersonaGateway {
        async fn complete(
            &self,
            _model: &Model,
            _messages: &[Message],
            _options: &ChatOptions,
        ) -> Result<CompletionMessage, GatewayError> {
            Ok(CompletionMessage::text(
                r#"{"queries": ["You are an economist.", "You are an engineer."]}"#,
            ))
        }
    }

    struct EmptySearch;

    #[async_trait]
    impl SearchProvider for EmptySearch {
        async fn text(&self, _query: &SearchQuery) -> Result<Vec<SearchResult>, SearchError> {
            Ok(Vec::new())
        }
    }

    struct NoFetcher;

    #[async_trait]
    impl ContentFetcher for NoFetcher {
        async fn fetch(&self, _url: &str) -> Option<String> {
            None
        }
    }

    fn deps() -> PanelDeps {
        PanelDeps::new(
            Arc::new(PersonaGateway),
            Arc::new(EmptySearch),
            Arc::new(NoFetcher),
            Arc::new(NoDiscussionLogger),
        )
    }

    #[tokio::test]
    async fn test_pads_to_requested_count() {
        let personas = generate_personas(&deps(), &Model::Gpt4oMini, "topic", 4).await;
        assert_eq!(personas.len(), 4);
        assert_eq!(personas[0], "You are an economist.");
        assert_eq!(personas[3], PanelPrompt::default_persona());
    }

    #[tokio::test]
    async fn test_truncates_to_requested_count() {
        let personas = generate_personas(&deps(), &Model::Gpt4oMini, "topic", 1).await;
        assert_eq!(personas.len(), 1);
    }
}
