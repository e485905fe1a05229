use crate::error::{Result, SwarmError};
use std::{env, fmt};

pub const DEFAULT_MODEL: &str = "meta-llama/Meta-Llama-3.1-70B-Instruct";
pub const DEFAULT_MAX_TOKENS: i64 = 4096;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_API_BASE: &str = "https://router.huggingface.co/v1";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7860;

pub const TOKEN_ENV: &str = "HF_TOKEN";

pub const AVAILABLE_MODELS: &[&str] = &[
    "meta-llama/Meta-Llama-3.1-70B-Instruct",
    "meta-llama/Meta-Llama-3.1-8B-Instruct",
    "mistralai/Mixtral-8x7B-Instruct-v0.1",
    "google/gemma-7b-it",
];

/// Bearer token for the inference endpoint. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Reads `HF_TOKEN`; an empty value counts as unset.
    pub fn from_env() -> Option<Self> {
        env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.is_empty())
            .map(Self)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

#[derive(Debug, Clone)]
pub struct SwarmConfig {
    pub model: String,
    pub max_tokens: i64,
    pub temperature: f64,
    pub api_base: String,
    pub token: Option<Credential>,
    pub available_models: Vec<String>,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        SwarmConfig {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            available_models: AVAILABLE_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl SwarmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Malformed numbers fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let present = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let model = present("SWARM_MODEL").unwrap_or(defaults.model);
        let max_tokens = present("SWARM_MAX_TOKENS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);
        let temperature = present("SWARM_TEMPERATURE")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);
        let api_base = present("SWARM_API_BASE").unwrap_or(defaults.api_base);
        let token = present(TOKEN_ENV).map(Credential);

        SwarmConfig {
            model,
            max_tokens,
            temperature,
            api_base,
            token,
            available_models: defaults.available_models,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: i64) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Credential::new(token));
        self
    }

    pub fn without_token(mut self) -> Self {
        self.token = None;
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn validate_token(&self) -> Result<&Credential> {
        self.token.as_ref().ok_or_else(|| {
            SwarmError::Configuration(
                "HF_TOKEN not set. Please configure your Hugging Face token.".to_string(),
            )
        })
    }

    /// Settings that differ from the built-in defaults, as
    /// `(setting, default, current)`.
    pub fn overrides(&self) -> Vec<(&'static str, String, String)> {
        let defaults = Self::default();
        let mut changed = Vec::new();
        if self.model != defaults.model {
            changed.push(("SWARM_MODEL", defaults.model, self.model.clone()));
        }
        if self.max_tokens != defaults.max_tokens {
            changed.push((
                "SWARM_MAX_TOKENS",
                defaults.max_tokens.to_string(),
                self.max_tokens.to_string(),
            ));
        }
        if self.temperature != defaults.temperature {
            changed.push((
                "SWARM_TEMPERATURE",
                defaults.temperature.to_string(),
                self.temperature.to_string(),
            ));
        }
        if self.api_base != defaults.api_base {
            changed.push(("SWARM_API_BASE", defaults.api_base, self.api_base.clone()));
        }
        changed
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        ServerConfig { host, port }
    }
}
