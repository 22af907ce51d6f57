//! OpenAI-compatible chat-completions adapter.
//!
//! Implements [`CompletionGateway`] against any endpoint speaking the
//! `/v1/chat/completions` wire format. Retry and concurrency control are
//! not handled here — the application wraps this adapter in
//! `ThrottledGateway`; this layer only classifies failures (429 maps to
//! the retryable `RateLimited` variant).

use async_trait::async_trait;
use colloquy_application::ports::completion_gateway::{
    ChatOptions, CompletionGateway, GatewayError, ToolChoice,
};
use colloquy_domain::{CompletionMessage, Message, Model, ToolInvocation};
use serde_json::{Value, json};
use tracing::debug;

/// Default API endpoint when `OPENAI_API_URL` is not set.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Gateway adapter for OpenAI-compatible completion providers.
pub struct OpenAiGateway {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiGateway {
    /// Create a gateway with explicit credentials.
    ///
    /// Fails with `MissingConfiguration` when the key is empty — absent
    /// credentials are fatal at startup, not at first call.
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Result<Self, GatewayError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(GatewayError::MissingConfiguration(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    /// Create a gateway from the `OPENAI_API_KEY` / `OPENAI_API_URL`
    /// environment variables.
    pub fn from_env() -> Result<Self, GatewayError> {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let base_url = std::env::var("OPENAI_API_URL").ok();
        Self::new(api_key, base_url)
    }

    fn build_body(model: &Model, messages: &[Message], options: &ChatOptions) -> Value {
        let rendered: Vec<Value> = messages
            .iter()
            .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
            .collect();

        let mut body = json!({
            "model": model.as_str(),
            "messages": rendered,
        });

        if let Some(temperature) = options.temperature {
            body["temperature"] = json!(temperature);
        }
        if options.json_response {
            body["response_format"] = json!({"type": "json_object"});
        }
        if !options.tools.is_empty() {
            body["tools"] = Value::Array(
                options
                    .tools
                    .iter()
                    .map(|tool| {
                        json!({
                            "type": "function",
                            "function": {
                                "name": tool.name,
                                "description": tool.description,
                                "parameters": tool.parameters,
                            }
                        })
                    })
                    .collect(),
            );
            body["tool_choice"] = match &options.tool_choice {
                Some(ToolChoice::Required(name)) => {
                    json!({"type": "function", "function": {"name": name}})
                }
                Some(ToolChoice::None) => json!("none"),
                Some(ToolChoice::Auto) | None => json!("auto"),
            };
        }

        body
    }

    fn parse_message(body: &Value) -> Result<CompletionMessage, GatewayError> {
        let message = body
            .pointer("/choices/0/message")
            .ok_or_else(|| GatewayError::MalformedResponse("no choices in response".to_string()))?;

        let content = message
            .get("content")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let tool_calls = message
            .get("tool_calls")
            .and_then(|v| v.as_array())
            .map(|calls| {
                calls
                    .iter()
                    .filter_map(|call| {
                        let function = call.get("function")?;
                        Some(ToolInvocation {
                            name: function.get("name")?.as_str()?.to_string(),
                            arguments: function.get("arguments")?.as_str()?.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(CompletionMessage {
            content,
            tool_calls,
        })
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    async fn complete(
        &self,
        model: &Model,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<CompletionMessage, GatewayError> {
        let body = Self::build_body(model, messages, options);
        debug!(model = %model, messages = messages.len(), "Invoking completion");

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(GatewayError::RateLimited);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "{}: {}",
                status, detail
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        Self::parse_message(&payload)
    }
}
