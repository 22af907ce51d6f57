//! Per-group round scheduler.
//!
//! One state per turn index: turn 0 of the round up to `max_steps`. Agents
//! take strict round-robin turns, restarting at index 0 every round, and
//! each rendered turn is appended to the group history immediately so the
//! next agent in the same round sees it.

use crate::ports::discussion_logger::{DiscussionEvent, DiscussionEventKind};
use crate::use_cases::agent_reply::generate_reply;
use crate::use_cases::deep_research::DeepResearch;
use crate::use_cases::shared::PanelDeps;
use colloquy_domain::{DiscussionGroup, Model, PanelPrompt, ResearchBounds};
use tracing::{info, warn};

/// One discussion group plus its round-level research configuration.
pub struct GroupSession {
    pub group: DiscussionGroup,
    /// Bounds for directive-driven research at round start.
    pub research: ResearchBounds,
    pub research_model: Model,
}

impl GroupSession {
    pub fn new(group: DiscussionGroup, research: ResearchBounds, research_model: Model) -> Self {
        Self {
            group,
            research,
            research_model,
        }
    }

    /// Run one round: an optional research briefing, then `max_steps`
    /// round-robin turns.
    ///
    /// Agent failures surface only as their sentinel reply text, are still
    /// appended to history, and never interrupt the round.
    pub async fn start_round(
        &mut self,
        deps: &PanelDeps,
        round: usize,
        directive: Option<&str>,
        max_steps: usize,
    ) {
        if self.group.agents.is_empty() {
            warn!(group = self.group.index, "Group has no agents, skipping round");
            return;
        }

        info!(
            group = self.group.index,
            round,
            topic = %self.group.topic,
            "Starting round"
        );
        deps.logger.log(DiscussionEvent::new(
            DiscussionEventKind::RoundStarted,
            serde_json::json!({
                "group": self.group.index,
                "round": round,
                "topic": self.group.topic,
            }),
        ));

        if let Some(directive) = directive {
            let engine = DeepResearch::new(deps.clone(), self.research_model.clone());
            let outcome = engine.run(directive, self.research).await;
            if !outcome.learnings.is_empty() {
                self.group
                    .append_turn(PanelPrompt::research_briefing(directive, &outcome.learnings));
            }
        }

        for step in 0..max_steps {
            let idx = self.group.agent_for_step(step);
            let agent_id = self.group.agents[idx].id.clone();

            deps.logger.log(DiscussionEvent::new(
                DiscussionEventKind::StepStarted,
                serde_json::json!({
                    "group": self.group.index,
                    "round": round,
                    "step": step,
                    "agent": agent_id.as_str(),
                }),
            ));

            let prompt = if self.group.history().is_empty() {
                PanelPrompt::round_opening(round, &self.group.topic)
            } else {
                PanelPrompt::turn_prompt(round, &self.group.topic, &self.group.rendered_history())
            };

            let reply = generate_reply(deps, &mut self.group.agents[idx], prompt).await;

            self.group.append_turn(format!("{}: {}", agent_id, reply));
            deps.logger.log(DiscussionEvent::new(
                DiscussionEventKind::MessageSent,
                serde_json::json!({
                    "group": self.group.index,
                    "round": round,
                    "step": step,
                    "agent": agent_id.as_str(),
                    "message": reply,
                }),
            ));
        }

        deps.logger.log(DiscussionEvent::new(
            DiscussionEventKind::RoundEnded,
            serde_json::json!({
                "group": self.group.index,
                "round": round,
            }),
        ));
    }
}
