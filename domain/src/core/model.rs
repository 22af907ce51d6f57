//! Model value object representing an LLM model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Available LLM models (Value Object)
///
/// This is a domain concept representing the completion models a panelist,
/// researcher, or summarizer may be bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // GPT chat models
    Gpt4oMini,
    Gpt4o,
    Gpt41,
    Gpt41Mini,
    // o-series reasoning models (no system role)
    O1,
    O1Mini,
    O3Mini,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Gpt4o => "gpt-4o",
            Model::Gpt41 => "gpt-4.1",
            Model::Gpt41Mini => "gpt-4.1-mini",
            Model::O1 => "o1",
            Model::O1Mini => "o1-mini",
            Model::O3Mini => "o3-mini",
            Model::Custom(s) => s,
        }
    }

    /// Whether the model accepts a `system` role message.
    ///
    /// The o-series reasoning models reject the system role, so persona and
    /// instruction prompts are sent with the `user` role instead.
    pub fn accepts_system_role(&self) -> bool {
        !self.as_str().starts_with('o')
    }

    /// The default panelist model
    pub fn default_model() -> Model {
        Model::Gpt4oMini
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::default_model()
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s {
            "gpt-4o-mini" => Model::Gpt4oMini,
            "gpt-4o" => Model::Gpt4o,
            "gpt-4.1" => Model::Gpt41,
            "gpt-4.1-mini" => Model::Gpt41Mini,
            "o1" => Model::O1,
            "o1-mini" => Model::O1Mini,
            "o3-mini" => Model::O3Mini,
            other => Model::Custom(other.to_string()),
        }
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::from(s))
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}
