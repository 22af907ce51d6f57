//! Discussion group: one subgroup of agents and its rendered turn history.

use crate::agent::Agent;

/// Deterministic session handle for a topic.
///
/// The same topic always maps to the same handle, so an external replay
/// store can resume or re-attach to a session by topic alone.
pub fn session_id(topic: &str) -> String {
    format!("{:x}", md5::compute(topic.as_bytes()))
}

/// One group of panelists discussing the shared topic.
///
/// Mutated only between round boundaries (the scheduler appends turns
/// sequentially within a round; the network appends insight broadcasts
/// after the cross-group barrier).
#[derive(Debug)]
pub struct DiscussionGroup {
    pub index: usize,
    pub topic: String,
    pub agents: Vec<Agent>,
    /// Ordered history of rendered turns, `"agent-id: reply"` strings.
    history: Vec<String>,
}

impl DiscussionGroup {
    pub fn new(index: usize, topic: impl Into<String>, agents: Vec<Agent>) -> Self {
        Self {
            index,
            topic: topic.into(),
            agents,
            history: Vec::new(),
        }
    }

    /// Index of the agent taking turn `step`, strict round-robin from 0.
    pub fn agent_for_step(&self, step: usize) -> usize {
        step % self.agents.len()
    }

    pub fn append_turn(&mut self, turn: String) {
        self.history.push(turn);
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// The most recent `n` turns (all of them when fewer exist).
    pub fn recent_history(&self, n: usize) -> &[String] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// Render the whole history as one newline-joined transcript.
    pub fn rendered_history(&self) -> String {
        self.history.join("\n")
    }
}
