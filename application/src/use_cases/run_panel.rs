//! Top-level panel orchestrator.
//!
//! Owns all discussion groups, runs synchronized rounds (all groups
//! concurrently, joined by a hard barrier), triggers per-round research
//! directives, cross-broadcasts per-group insight summaries, and produces
//! the final report plus one revision pass.

use crate::ports::completion_gateway::{ChatOptions, GatewayError};
use crate::ports::discussion_logger::{DiscussionEvent, DiscussionEventKind};
use crate::use_cases::run_round::GroupSession;
use crate::use_cases::shared::{PanelDeps, instruction_message};
use colloquy_domain::{
    Agent, DiscussionGroup, DomainError, Message, Model, PanelPrompt, ResearchBounds,
    parse_query_list, session_id,
};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Errors that abort a panel session
#[derive(Error, Debug)]
pub enum RunPanelError {
    #[error("No groups created. Split the agents into subgroups first")]
    NoGroups,

    /// A failure escaped a group's round task. Per-turn and summarization
    /// failures are contained lower down; anything that reaches here takes
    /// the whole session with it.
    #[error("Group round failed: {0}")]
    GroupFailed(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Split agents into `num_groups` discussion groups of roughly equal size.
pub fn build_groups(
    agents: Vec<Agent>,
    num_groups: usize,
    topic: &str,
    research: ResearchBounds,
    research_model: Model,
) -> Result<Vec<GroupSession>, DomainError> {
    if agents.is_empty() {
        return Err(DomainError::NoAgents);
    }
    if num_groups == 0 {
        return Err(DomainError::InvalidParameters(
            "number of groups must be at least 1".to_string(),
        ));
    }
    let group_size = agents.len().div_ceil(num_groups);
    let mut sessions = Vec::new();
    let mut agents = agents.into_iter().peekable();
    let mut index = 0;
    while agents.peek().is_some() {
        let chunk: Vec<Agent> = agents.by_ref().take(group_size).collect();
        sessions.push(GroupSession::new(
            DiscussionGroup::new(index, topic, chunk),
            research,
            research_model.clone(),
        ));
        index += 1;
    }
    Ok(sessions)
}

/// The panel network: all groups plus the session-wide insight list.
pub struct PanelNetwork {
    deps: PanelDeps,
    sessions: Vec<GroupSession>,
    summary_model: Model,
    shared_insights: Vec<String>,
}

impl PanelNetwork {
    pub fn new(deps: PanelDeps, sessions: Vec<GroupSession>, summary_model: Model) -> Self {
        Self {
            deps,
            sessions,
            summary_model,
            shared_insights: Vec::new(),
        }
    }

    /// Run the full session: `num_rounds` synchronized rounds of
    /// `max_steps` turns per group, insight sharing after every round,
    /// then the final report and its revision.
    pub async fn start_conversations(
        mut self,
        topic: &str,
        num_rounds: usize,
        max_steps: usize,
    ) -> Result<(String, String), RunPanelError> {
        if self.sessions.is_empty() {
            return Err(RunPanelError::NoGroups);
        }
        if topic.trim().is_empty() {
            return Err(DomainError::InvalidTopic("topic is empty".to_string()).into());
        }
        if num_rounds == 0 || max_steps == 0 {
            return Err(DomainError::InvalidParameters(
                "rounds and steps must be at least 1".to_string(),
            )
            .into());
        }
        let num_groups = self.sessions.len();

        info!(topic, num_rounds, max_steps, num_groups, "Starting panel session");
        self.deps.logger.log(DiscussionEvent::new(
            DiscussionEventKind::ConversationStarted,
            serde_json::json!({
                "session": session_id(topic),
                "topic": topic,
                "groups": num_groups,
            }),
        ));

        for round in 0..num_rounds {
            let directives = self.generate_directives(topic, num_groups).await;

            // All groups run concurrently; the barrier below guarantees
            // every group observes an identical insight snapshot entering
            // the sharing phase.
            let mut join_set = JoinSet::new();
            for mut session in self.sessions.drain(..) {
                let deps = self.deps.clone();
                let directive = directives
                    .get(session.group.index)
                    .cloned()
                    .flatten();
                join_set.spawn(async move {
                    session
                        .start_round(&deps, round, directive.as_deref(), max_steps)
                        .await;
                    session
                });
            }

            let mut finished = Vec::with_capacity(num_groups);
            while let Some(result) = join_set.join_next().await {
                match result {
                    Ok(session) => finished.push(session),
                    Err(e) => return Err(RunPanelError::GroupFailed(e.to_string())),
                }
            }
            finished.sort_by_key(|session| session.group.index);
            self.sessions = finished;

            self.share_insights(max_steps).await;
        }

        let report = self.final_report(topic).await?;
        let revised = self.revise_report(topic, &report).await?;

        self.deps.logger.log(DiscussionEvent::new(
            DiscussionEventKind::FinalReports,
            serde_json::json!({
                "report": report,
                "revised_report": revised,
            }),
        ));

        Ok((report, revised))
    }

    /// Generate one research directive per group from the topic and the
    /// insights accumulated so far. Under-delivery pads with `None`; a
    /// gateway failure degrades to no directives at all.
    async fn generate_directives(&self, topic: &str, num_groups: usize) -> Vec<Option<String>> {
        let messages = [Message::user(PanelPrompt::round_directives(
            topic,
            num_groups,
            &self.shared_insights,
        ))];
        let generated = match self
            .deps
            .gateway
            .complete(&self.summary_model, &messages, &ChatOptions::json())
            .await
        {
            Ok(completion) => {
                parse_query_list(&completion.content_or_default(), num_groups)
            }
            Err(e) => {
                warn!(error = %e, "Directive generation failed, groups run without research");
                Vec::new()
            }
        };
        let mut directives: Vec<Option<String>> = generated.into_iter().map(Some).collect();
        directives.resize(num_groups, None);
        directives
    }

    /// Summarize each group's latest window and broadcast it into every
    /// other group. A summarization failure is logged and skipped; it never
    /// blocks sharing for the remaining groups.
    async fn share_insights(&mut self, max_steps: usize) {
        info!("Sharing insights between groups");

        for i in 0..self.sessions.len() {
            let window = self.sessions[i]
                .group
                .recent_history(max_steps + 1)
                .join("\n");
            let messages = [
                instruction_message(&self.summary_model, PanelPrompt::insight_summarizer_system()),
                Message::user(window),
            ];
            let summary = match self
                .deps
                .gateway
                .complete(&self.summary_model, &messages, &ChatOptions::default())
                .await
            {
                Ok(completion) => completion.content_or_default(),
                Err(e) => {
                    warn!(group = i, error = %e, "Insight summarization failed, skipping group");
                    continue;
                }
            };

            self.shared_insights.push(summary.clone());

            for j in 0..self.sessions.len() {
                if i == j {
                    continue;
                }
                self.sessions[j]
                    .group
                    .append_turn(PanelPrompt::insight_broadcast(i, &summary));
                self.deps.logger.log(DiscussionEvent::new(
                    DiscussionEventKind::InsightsShared,
                    serde_json::json!({
                        "from_group": i,
                        "to_group": j,
                        "summary": summary,
                    }),
                ));
            }
        }
    }

    /// Synthesize the final report from the full shared-insights list.
    async fn final_report(&self, topic: &str) -> Result<String, RunPanelError> {
        info!("Generating final report");
        let messages = [
            instruction_message(&self.summary_model, PanelPrompt::final_report_system(topic)),
            Message::user(self.shared_insights.join("\n")),
        ];
        let completion = self
            .deps
            .gateway
            .complete(&self.summary_model, &messages, &ChatOptions::default())
            .await?;
        Ok(completion.content_or_default())
    }

    /// One revision pass over the final report.
    async fn revise_report(&self, topic: &str, report: &str) -> Result<String, RunPanelError> {
        let messages = [
            instruction_message(&self.summary_model, PanelPrompt::revision_system(topic)),
            Message::user(report),
        ];
        let completion = self
            .deps
            .gateway
            .complete(&self.summary_model, &messages, &ChatOptions::default())
            .await?;
        Ok(completion.content_or_default())
    }
}
