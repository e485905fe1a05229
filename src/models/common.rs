use crate::validation;
use serde::{Deserialize, Serialize};

/// Sampling settings for one request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// One deploy action: the user's task plus the controls chosen for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmRequest {
    pub task: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: i64,
}

impl SwarmRequest {
    pub fn new(task: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            model: model.into(),
            temperature: crate::config::DEFAULT_TEMPERATURE,
            max_tokens: crate::config::DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: i64) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Generation settings for the remote call. The token budget is pinned
    /// to the accepted range, so call this after validation.
    pub fn parameters(&self) -> GenerationParameters {
        GenerationParameters {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self
                .max_tokens
                .clamp(validation::MAX_TOKENS_MIN, validation::MAX_TOKENS_MAX)
                as u32,
        }
    }
}

/// A single exchange shown in the chat pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub assistant: Option<String>,
}
