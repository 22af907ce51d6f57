//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use colloquy_domain::Model;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("number of agents must be at least 2")]
    TooFewAgents,

    #[error("number of groups must be at least 1")]
    NoGroups,

    #[error("number of agents must be divisible by number of groups")]
    UnevenGroups,

    #[error("each group needs at least 2 agents")]
    TooFewAgentsPerGroup,

    #[error("number of rounds must be at least 1")]
    NoRounds,

    #[error("number of steps must be at least 2")]
    TooFewSteps,

    #[error("at least one non-empty model name is required")]
    EmptyModelName,

    #[error("research breadth and depth must be at least 1")]
    InvalidResearchBounds,
}

/// Raw API configuration from TOML
///
/// The API key itself always comes from `OPENAI_API_KEY`; config files
/// only carry the endpoint override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// Base URL of an OpenAI-compatible endpoint
    pub base_url: Option<String>,
}

/// Raw panel configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePanelConfig {
    /// Total number of agents across all groups
    pub agents: usize,
    /// Number of concurrent discussion groups
    pub groups: usize,
    /// Discussion rounds before the final report
    pub rounds: usize,
    /// Turns per group per round
    pub steps: usize,
    /// Model names, assigned to agents round-robin
    pub models: Vec<String>,
    /// Messages of context an agent keeps between turns
    pub history_limit: usize,
    /// Generate per-agent personas instead of the shared one
    pub generate_personas: bool,
}

impl Default for FilePanelConfig {
    fn default() -> Self {
        Self {
            agents: 4,
            groups: 2,
            rounds: 3,
            steps: 5,
            models: vec![Model::default().to_string()],
            history_limit: 20,
            generate_personas: false,
        }
    }
}

/// Raw research configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResearchConfig {
    /// Parallel search queries per research level
    pub breadth: usize,
    /// Recursive research levels
    pub depth: usize,
    /// Model for research passes (defaults to the agent's model)
    pub model: Option<String>,
}

impl Default for FileResearchConfig {
    fn default() -> Self {
        Self {
            breadth: 2,
            depth: 2,
            model: None,
        }
    }
}

/// Raw log configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// Discussion event log path
    pub file: String,
}

impl Default for FileLogConfig {
    fn default() -> Self {
        Self {
            file: "discussion.jsonl".to_string(),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// API settings
    pub api: FileApiConfig,
    /// Panel settings
    pub panel: FilePanelConfig,
    /// Research settings
    pub research: FileResearchConfig,
    /// Log settings
    pub log: FileLogConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.panel.agents < 2 {
            return Err(ConfigValidationError::TooFewAgents);
        }
        if self.panel.groups < 1 {
            return Err(ConfigValidationError::NoGroups);
        }
        if self.panel.agents % self.panel.groups != 0 {
            return Err(ConfigValidationError::UnevenGroups);
        }
        if self.panel.agents / self.panel.groups < 2 {
            return Err(ConfigValidationError::TooFewAgentsPerGroup);
        }
        if self.panel.rounds < 1 {
            return Err(ConfigValidationError::NoRounds);
        }
        if self.panel.steps < 2 {
            return Err(ConfigValidationError::TooFewSteps);
        }
        if self.panel.models.is_empty()
            || self.panel.models.iter().any(|m| m.trim().is_empty())
        {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.research.breadth < 1 || self.research.depth < 1 {
            return Err(ConfigValidationError::InvalidResearchBounds);
        }
        Ok(())
    }
}
