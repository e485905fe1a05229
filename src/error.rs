use thiserror::Error;

/// Reason a single input was rejected before any network access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ValidationError {
    pub reason: String,
}

impl ValidationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SwarmError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl SwarmError {
    /// Label recorded in error log entries.
    pub fn kind(&self) -> &'static str {
        match self {
            SwarmError::Validation(_) => "ValidationError",
            SwarmError::Configuration(_) => "ConfigurationError",
            SwarmError::Api(_) => "APIError",
            SwarmError::Unexpected(_) => "UnexpectedError",
        }
    }

    /// The message without the taxonomy prefix.
    pub fn message(&self) -> String {
        match self {
            SwarmError::Validation(e) => e.reason.clone(),
            SwarmError::Configuration(msg)
            | SwarmError::Api(msg)
            | SwarmError::Unexpected(msg) => msg.clone(),
        }
    }
}

impl From<serde_json::Error> for SwarmError {
    fn from(e: serde_json::Error) -> Self {
        SwarmError::Api(format!("Malformed stream event: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, SwarmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(SwarmError::Api("x".into()).kind(), "APIError");
        assert_eq!(
            SwarmError::Configuration("x".into()).kind(),
            "ConfigurationError"
        );
        assert_eq!(
            SwarmError::from(ValidationError::new("bad")).kind(),
            "ValidationError"
        );
    }

    #[test]
    fn test_display_and_message() {
        let err = SwarmError::Api("Connection failed".into());
        assert_eq!(err.to_string(), "API error: Connection failed");
        assert_eq!(err.message(), "Connection failed");
    }
}
