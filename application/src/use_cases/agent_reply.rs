//! One panelist turn: prompt in, reply text out.
//!
//! The agent is a pure request/response unit — all scheduling lives in the
//! group scheduler. A failed invocation yields a sentinel reply instead of
//! an error, so a single agent can never abort its round.

use crate::ports::completion_gateway::{ChatOptions, ToolChoice};
use crate::use_cases::deep_research::DeepResearch;
use crate::use_cases::shared::PanelDeps;
use colloquy_domain::{Agent, AgentTool, Message, PanelPrompt, tool::research_tool_definition};
use tracing::{info, warn};

/// Sentinel reply returned when the invocation fails.
pub const REPLY_FAILURE: &str = "Error generating response.";

/// Generate one reply for `agent` given the rendered turn prompt.
///
/// The prompt is appended to the agent's history as a user turn; the
/// request sent is persona + full history. A research tool call runs the
/// research engine with the agent's own breadth/depth bounds and feeds the
/// learnings back into the history. History is trimmed to the agent's cap
/// before returning.
pub async fn generate_reply(deps: &PanelDeps, agent: &mut Agent, prompt: String) -> String {
    agent.push_history(Message::user(prompt));

    let options = ChatOptions::with_tools(vec![research_tool_definition()], ToolChoice::Auto);
    let request = agent.build_request();

    let completion = match deps.gateway.complete(&agent.model, &request, &options).await {
        Ok(completion) => completion,
        Err(e) => {
            warn!(agent = %agent.id, error = %e, "Reply generation failed");
            agent.trim_history();
            return REPLY_FAILURE.to_string();
        }
    };

    let reply = completion.content_or_default();

    if completion.tool_calls.is_empty() {
        agent.push_history(Message::assistant(reply.clone()));
    } else {
        for invocation in &completion.tool_calls {
            match AgentTool::parse(invocation) {
                Ok(AgentTool::Research { query }) => {
                    info!(agent = %agent.id, query = %query, "Performing research");
                    let research = DeepResearch::new(deps.clone(), agent.research_model.clone());
                    let outcome = research.run(&query, agent.research).await;
                    agent.push_history(Message::user(PanelPrompt::research_learnings_message(
                        &query,
                        &outcome.learnings,
                    )));
                }
                Err(e) => {
                    warn!(agent = %agent.id, error = %e, "Unsupported tool call");
                }
            }
        }
    }

    agent.trim_history();
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::completion_gateway::{CompletionGateway, GatewayError};
    use crate::ports::content::ContentFetcher;
    use crate::ports::discussion_logger::NoDiscussionLogger;
    use crate::ports::search::{SearchError, SearchProvider, SearchQuery};
    use async_trait::async_trait;
    use colloquy_domain::{
        CompletionMessage, Model, ResearchBounds, Role, SearchResult, tool::ToolInvocation,
    };
    use std::sync::Arc;

    struct EchoGateway;

    #[async_trait]
    impl CompletionGateway for EchoGateway {
        async fn complete(
            &self,
            _model: &Model,
            _messages: &[Message],
            _options: &ChatOptions,
        ) -> Result<CompletionMessage, GatewayError> {
            Ok(CompletionMessage::text("a considered reply"))
        }
    }

    struct BrokenGateway;

    #[async_trait]
    impl CompletionGateway for BrokenGateway {
        async fn complete(
            &self,
            _model: &Model,
            _messages: &[Message],
            _options: &ChatOptions,
        ) -> Result<CompletionMessage, GatewayError> {
            Err(GatewayError::ConnectionError("offline".to_string()))
        }
    }

    /// First call returns a research tool call, later calls plain text.
    struct ResearchOnceGateway {
        first: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl CompletionGateway for ResearchOnceGateway {
        async fn complete(
            &self,
            _model: &Model,
            _messages: &[Message],
            _options: &ChatOptions,
        ) -> Result<CompletionMessage, GatewayError> {
            if self.first.swap(false, std::sync::atomic::Ordering::SeqCst) {
                Ok(CompletionMessage {
                    content: None,
                    tool_calls: vec![ToolInvocation {
                        name: "deep_research".to_string(),
                        arguments: r#"{"query": "flow batteries"}"#.to_string(),
                    }],
                })
            } else {
                Ok(CompletionMessage::text(r#"{"queries": []}"#))
            }
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

    fn deps_with(gateway: Arc<dyn CompletionGateway>) -> PanelDeps {
        PanelDeps::new(
            gateway,
            Arc::new(EmptySearch),
            Arc::new(NoFetcher),
            Arc::new(NoDiscussionLogger),
        )
    }

    fn test_agent() -> Agent {
        Agent::new(
            "agent-0",
            Model::Gpt4oMini,
            "persona",
            10,
            ResearchBounds::new(1, 1),
            None,
        )
    }

    #[tokio::test]
    async fn test_reply_appends_prompt_and_assistant_turn() {
        let deps = deps_with(Arc::new(EchoGateway));
        let mut agent = test_agent();

        let reply = generate_reply(&deps, &mut agent, "what do you think?".to_string()).await;

        assert_eq!(reply, "a considered reply");
        assert_eq!(agent.history().len(), 2);
        assert_eq!(agent.history()[0].role, Role::User);
        assert_eq!(agent.history()[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_failure_returns_sentinel_not_error() {
        let deps = deps_with(Arc::new(BrokenGateway));
        let mut agent = test_agent();

        let reply = generate_reply(&deps, &mut agent, "prompt".to_string()).await;

        assert_eq!(reply, REPLY_FAILURE);
        // The prompt stays in history; no assistant turn was recorded.
        assert_eq!(agent.history().len(), 1);
    }

    #[tokio::test]
    async fn test_research_tool_call_feeds_learnings_into_history() {
        let deps = deps_with(Arc::new(ResearchOnceGateway {
            first: std::sync::atomic::AtomicBool::new(true),
        }));
        let mut agent = test_agent();

        generate_reply(&deps, &mut agent, "prompt".to_string()).await;

        let last = agent.history().last().unwrap();
        assert_eq!(last.role, Role::User);
        assert!(last.content.starts_with("Researched topic: \"flow batteries\""));
    }

    #[tokio::test]
    async fn test_history_is_trimmed_at_turn_boundary() {
        let deps = deps_with(Arc::new(EchoGateway));
        let mut agent = Agent::new(
            "agent-0",
            Model::Gpt4oMini,
            "persona",
            2,
            ResearchBounds::new(1, 1),
            None,
        );

        for i in 0..6 {
            generate_reply(&deps, &mut agent, format!("prompt {}", i)).await;
        }

        assert_eq!(agent.history().len(), 4);
    }
}
