//! Completion gateway port
//!
//! Defines the interface for one-shot chat completions against a remote
//! model provider. Implementations (adapters) live in the infrastructure
//! layer; the application wraps them in
//! [`ThrottledGateway`](crate::gateway::throttled::ThrottledGateway) to add
//! the global concurrency ceiling and rate-limit retry policy.

use async_trait::async_trait;
use colloquy_domain::{CompletionMessage, Message, Model, ToolDefinition};
use thiserror::Error;

/// Errors that can occur during completion gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The provider rejected the call for rate reasons; retryable.
    #[error("Rate limited by the completion provider")]
    RateLimited,

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// Fatal at startup (e.g. absent credentials).
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),
}

/// How the model should treat the advertised tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
    /// The model decides whether to call a tool.
    Auto,
    /// No tool may be called.
    None,
    /// The named tool must be called.
    Required(String),
}

/// Per-invocation options
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub temperature: Option<f64>,
    /// Request a JSON-object response format.
    pub json_response: bool,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: Option<ToolChoice>,
}

impl ChatOptions {
    pub fn json() -> Self {
        Self {
            json_response: true,
            ..Self::default()
        }
    }

    pub fn with_tools(tools: Vec<ToolDefinition>, choice: ToolChoice) -> Self {
        Self {
            tools,
            tool_choice: Some(choice),
            ..Self::default()
        }
    }
}

/// Gateway for chat completions
///
/// Purely functional from the orchestration's perspective: one request in,
/// one completion message out, no session state.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(
        &self,
        model: &Model,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<CompletionMessage, GatewayError>;
}
