//! End-to-end orchestration flow over mock ports: two groups of two agents,
//! one round of two steps each, insight sharing, and both reports.

use async_trait::async_trait;
use colloquy_application::ports::completion_gateway::{
    ChatOptions, CompletionGateway, GatewayError,
};
use colloquy_application::ports::content::ContentFetcher;
use colloquy_application::ports::discussion_logger::{
    DiscussionEvent, DiscussionEventKind, DiscussionLogger,
};
use colloquy_application::ports::search::{SearchError, SearchProvider, SearchQuery};
use colloquy_application::use_cases::run_panel::{PanelNetwork, build_groups};
use colloquy_application::use_cases::shared::PanelDeps;
use colloquy_domain::{
    Agent, CompletionMessage, Message, Model, ResearchBounds, SearchResult, session_id,
};
use std::sync::{Arc, Mutex};

/// Gateway scripted by prompt shape.
struct ScriptedGateway;

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    async fn complete(
        &self,
        _model: &Model,
        messages: &[Message],
        _options: &ChatOptions,
    ) -> Result<CompletionMessage, GatewayError> {
        let prompt = &messages.last().unwrap().content;
        if prompt.contains("research directives") {
            // No directives: rounds run without research briefings.
            Ok(CompletionMessage::text(r#"{"queries": []}"#))
        } else if messages[0].content.contains("expert summarizer") {
            Ok(CompletionMessage::text("an insight summary"))
        } else if messages[0].content.contains("final report") {
            Ok(CompletionMessage::text("the final report"))
        } else if messages[0].content.contains("exacting editor") {
            Ok(CompletionMessage::text("the revised report"))
        } else {
            Ok(CompletionMessage::text("a panel reply"))
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

/// Logger that collects every event for later assertions.
#[derive(Default)]
struct CollectingLogger {
    events: Mutex<Vec<DiscussionEvent>>,
}

impl DiscussionLogger for CollectingLogger {
    fn log(&self, event: DiscussionEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl CollectingLogger {
    fn of_kind(&self, kind: DiscussionEventKind) -> Vec<DiscussionEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }
}

fn panel_agents(n: usize) -> Vec<Agent> {
    (0..n)
        .map(|i| {
            Agent::new(
                format!("agent-{}", i).as_str(),
                Model::Gpt4oMini,
                "persona",
                20,
                ResearchBounds::new(2, 2),
                None,
            )
        })
        .collect()
}

#[tokio::test]
async fn test_two_groups_one_round_end_to_end() {
    let logger = Arc::new(CollectingLogger::default());
    let deps = PanelDeps::new(
        Arc::new(ScriptedGateway),
        Arc::new(EmptySearch),
        Arc::new(NoFetcher),
        logger.clone(),
    );

    let topic = "renewable energy storage";
    let sessions = build_groups(
        panel_agents(4),
        2,
        topic,
        ResearchBounds::new(2, 2),
        Model::Gpt4oMini,
    )
    .unwrap();
    assert_eq!(sessions.len(), 2);

    let network = PanelNetwork::new(deps, sessions, Model::Gpt4oMini);
    let (report, revised) = network.start_conversations(topic, 1, 2).await.unwrap();

    assert!(!report.is_empty());
    assert!(!revised.is_empty());
    assert_eq!(report, "the final report");
    assert_eq!(revised, "the revised report");

    // Session handle is the deterministic function of the topic.
    let started = logger.of_kind(DiscussionEventKind::ConversationStarted);
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].payload["session"], session_id(topic));
    assert_eq!(started[0].payload["groups"], 2);

    // Each group ran exactly one round of exactly two turns.
    assert_eq!(logger.of_kind(DiscussionEventKind::RoundStarted).len(), 2);
    assert_eq!(logger.of_kind(DiscussionEventKind::RoundEnded).len(), 2);
    let sent = logger.of_kind(DiscussionEventKind::MessageSent);
    assert_eq!(sent.len(), 4);
    for group in 0..2u64 {
        let group_turns: Vec<_> = sent
            .iter()
            .filter(|e| e.payload["group"] == group)
            .collect();
        assert_eq!(group_turns.len(), 2);
    }

    // Insight sharing ran exactly once: one summary per group, broadcast
    // to every *other* group, so G * (G - 1) = 2 edges.
    let shared = logger.of_kind(DiscussionEventKind::InsightsShared);
    assert_eq!(shared.len(), 2);
    for group in 0..2u64 {
        let incoming: Vec<_> = shared
            .iter()
            .filter(|e| e.payload["to_group"] == group)
            .collect();
        assert_eq!(incoming.len(), 1);
        assert_ne!(incoming[0].payload["from_group"], group);
    }

    assert_eq!(logger.of_kind(DiscussionEventKind::FinalReports).len(), 1);
}

#[tokio::test]
async fn test_three_groups_share_three_insights_per_round() {
    let logger = Arc::new(CollectingLogger::default());
    let deps = PanelDeps::new(
        Arc::new(ScriptedGateway),
        Arc::new(EmptySearch),
        Arc::new(NoFetcher),
        logger.clone(),
    );

    let sessions = build_groups(
        panel_agents(3),
        3,
        "topic",
        ResearchBounds::new(2, 2),
        Model::Gpt4oMini,
    )
    .unwrap();
    let network = PanelNetwork::new(deps, sessions, Model::Gpt4oMini);
    network.start_conversations("topic", 2, 1).await.unwrap();

    // 2 rounds * 3 groups * 2 other groups = 12 broadcast edges.
    let shared = logger.of_kind(DiscussionEventKind::InsightsShared);
    assert_eq!(shared.len(), 12);
}

#[tokio::test]
async fn test_empty_panel_is_rejected() {
    let deps = PanelDeps::new(
        Arc::new(ScriptedGateway),
        Arc::new(EmptySearch),
        Arc::new(NoFetcher),
        Arc::new(colloquy_application::ports::discussion_logger::NoDiscussionLogger),
    );
    let network = PanelNetwork::new(deps, Vec::new(), Model::Gpt4oMini);
    let result = network.start_conversations("topic", 1, 1).await;
    assert!(result.is_err());
}
