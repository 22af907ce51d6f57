//! Agent entity: a stateful persona with a bounded conversation history.

use crate::core::model::Model;
use crate::research::ResearchBounds;
use crate::session::entities::{Message, Role};
use serde::{Deserialize, Serialize};

/// Identifier of a panelist within the session (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A synthetic discussant: fixed persona, bounded message history, and
/// research fan-out parameters. Owned exclusively by its discussion group;
/// it holds no scheduling state of its own.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub model: Model,
    pub persona: String,
    /// Ordered message history; entries beyond `2 * history_limit` are
    /// trimmed from the front at turn boundaries.
    history: Vec<Message>,
    pub history_limit: usize,
    pub research: ResearchBounds,
    pub research_model: Model,
}

impl Agent {
    pub fn new(
        id: impl Into<AgentId>,
        model: Model,
        persona: impl Into<String>,
        history_limit: usize,
        research: ResearchBounds,
        research_model: Option<Model>,
    ) -> Self {
        let model_clone = model.clone();
        Self {
            id: id.into(),
            model,
            persona: persona.into(),
            history: Vec::new(),
            history_limit,
            research,
            research_model: research_model.unwrap_or(model_clone),
        }
    }

    /// Append a message to the history. Does not trim; trimming happens once
    /// per turn via [`Agent::trim_history`].
    pub fn push_history(&mut self, message: Message) {
        self.history.push(message);
    }

    /// Drop the oldest entries so that at most `2 * history_limit` remain.
    pub fn trim_history(&mut self) {
        let cap = self.history_limit * 2;
        if self.history.len() > cap {
            self.history.drain(..self.history.len() - cap);
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Render the message list for one invocation: the persona first
    /// (system role when the model accepts it, user role otherwise),
    /// followed by the full current history.
    pub fn build_request(&self) -> Vec<Message> {
        let persona_role = if self.model.accepts_system_role() {
            Role::System
        } else {
            Role::User
        };
        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(Message {
            role: persona_role,
            content: self.persona.clone(),
        });
        messages.extend(self.history.iter().cloned());
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_agent(model: Model, history_limit: usize) -> Agent {
        Agent::new(
            "agent-0",
            model,
            "You are a panelist.",
            history_limit,
            ResearchBounds::new(2, 2),
            None,
        )
    }

    #[test]
    fn test_history_trim_keeps_most_recent() {
        let mut agent = test_agent(Model::Gpt4oMini, 2);
        for i in 0..7 {
            agent.push_history(Message::user(format!("m{}", i)));
        }
        agent.trim_history();
        // cap = 2 * 2 = 4, so m3..m6 remain
        assert_eq!(agent.history().len(), 4);
        assert_eq!(agent.history()[0].content, "m3");
        assert_eq!(agent.history()[3].content, "m6");
    }

    #[test]
    fn test_trim_is_noop_under_cap() {
        let mut agent = test_agent(Model::Gpt4oMini, 5);
        agent.push_history(Message::user("only"));
        agent.trim_history();
        assert_eq!(agent.history().len(), 1);
    }

    #[test]
    fn test_build_request_uses_system_role() {
        let mut agent = test_agent(Model::Gpt4oMini, 5);
        agent.push_history(Message::user("hello"));
        let request = agent.build_request();
        assert_eq!(request.len(), 2);
        assert_eq!(request[0].role, Role::System);
        assert_eq!(request[0].content, "You are a panelist.");
        assert_eq!(request[1].content, "hello");
    }

    #[test]
    fn test_build_request_downgrades_persona_for_o_models() {
        let agent = test_agent(Model::O1Mini, 5);
        let request = agent.build_request();
        assert_eq!(request[0].role, Role::User);
    }

    #[test]
    fn test_research_model_defaults_to_agent_model() {
        let agent = test_agent(Model::Gpt4o, 5);
        assert_eq!(agent.research_model, Model::Gpt4o);
    }
}
