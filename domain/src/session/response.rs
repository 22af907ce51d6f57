//! Completion response shape returned by the completion provider

use crate::tool::ToolInvocation;

/// The message a completion provider returns for one invocation.
///
/// `content` may be absent when the model responds with tool calls only.
#[derive(Debug, Clone, Default)]
pub struct CompletionMessage {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolInvocation>,
}

impl CompletionMessage {
    /// A plain text completion with no tool calls
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// The text content, or a fixed placeholder when the model returned none
    pub fn content_or_default(&self) -> String {
        self.content
            .clone()
            .unwrap_or_else(|| "No response".to_string())
    }
}
