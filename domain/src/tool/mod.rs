//! Tools an agent may invoke mid-discussion.
//!
//! Tool dispatch is a closed enum ([`AgentTool`]) matched exhaustively,
//! not a string-keyed function table. Currently there is exactly one tool:
//! recursive web research.

use serde::Deserialize;
use thiserror::Error;

/// Canonical tool name for the research tool, as advertised to the model.
pub const DEEP_RESEARCH: &str = "deep_research";

/// A tool definition advertised to the completion provider.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema of the tool parameters, in the provider's wire shape.
    pub parameters: serde_json::Value,
}

/// A tool call as returned by the completion provider: a name plus a raw
/// JSON argument string.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: String,
}

/// Errors when decoding a [`ToolInvocation`] into an [`AgentTool`]
#[derive(Error, Debug)]
pub enum ToolParseError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The closed set of tools a panelist can call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentTool {
    /// Perform recursive web research on a query.
    Research { query: String },
}

#[derive(Deserialize)]
struct ResearchArgs {
    query: String,
}

impl AgentTool {
    /// Decode a provider tool call into a typed tool.
    pub fn parse(invocation: &ToolInvocation) -> Result<Self, ToolParseError> {
        match invocation.name.as_str() {
            DEEP_RESEARCH => {
                let args: ResearchArgs = serde_json::from_str(&invocation.arguments)
                    .map_err(|source| ToolParseError::InvalidArguments {
                        tool: invocation.name.clone(),
                        source,
                    })?;
                Ok(AgentTool::Research { query: args.query })
            }
            other => Err(ToolParseError::UnknownTool(other.to_string())),
        }
    }
}

/// The definition of the research tool, offered to every panelist.
pub fn research_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: DEEP_RESEARCH,
        description: "Performs deep research on a given query and returns a list of learnings.",
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The query to research."
                }
            },
            "required": ["query"]
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_research_call() {
        let invocation = ToolInvocation {
            name: DEEP_RESEARCH.to_string(),
            arguments: r#"{"query": "grid-scale batteries"}"#.to_string(),
        };
        let tool = AgentTool::parse(&invocation).unwrap();
        assert_eq!(
            tool,
            AgentTool::Research {
                query: "grid-scale batteries".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unknown_tool() {
        let invocation = ToolInvocation {
            name: "rm_rf".to_string(),
            arguments: "{}".to_string(),
        };
        assert!(matches!(
            AgentTool::parse(&invocation),
            Err(ToolParseError::UnknownTool(_))
        ));
    }

    #[test]
    fn test_parse_bad_arguments() {
        let invocation = ToolInvocation {
            name: DEEP_RESEARCH.to_string(),
            arguments: "not json".to_string(),
        };
        assert!(matches!(
            AgentTool::parse(&invocation),
            Err(ToolParseError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_research_definition_schema() {
        let def = research_tool_definition();
        assert_eq!(def.name, DEEP_RESEARCH);
        assert_eq!(def.parameters["required"][0], "query");
    }
}
