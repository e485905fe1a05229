//! One deploy action from validated input to streamed display lines.
//!
//! `SwarmRunner::run` validates the request, checks the credential, builds
//! a client and the Builder Swarm prompt, then forwards every accumulated
//! snapshot. The first failure becomes a single line prefixed with
//! [`FAILURE_GLYPH`] and ends the stream.

use crate::{
    config::{Credential, SwarmConfig},
    error::{Result, SwarmError},
    inference::{SnapshotStream, SwarmClient},
    logger::SwarmLogger,
    models::SwarmRequest,
    prompts::build_swarm_prompt,
    validation::{validate_max_tokens, validate_task, validate_temperature},
};
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use std::time::Instant;

pub const FAILURE_GLYPH: &str = "❌";
pub const BANNER: &str = "🚀 Deploying Builder Swarm...\n\n";
pub const API_FAILURE_HINT: &str = "\n\nPlease check your HF_TOKEN and model access.";
pub const UNEXPECTED_FAILURE_HINT: &str = "\n\nPlease check your configuration and try again.";

pub fn failure_line(message: &str) -> String {
    format!("{} {}", FAILURE_GLYPH, message)
}

pub fn is_failure_line(line: &str) -> bool {
    line.starts_with(FAILURE_GLYPH)
}

/// Builds the streaming client for a request.
pub trait Connector: Send + Sync {
    fn connect(&self, model: &str, credential: &Credential) -> Result<SwarmClient>;
}

/// Connects to the configured Hugging Face endpoint.
#[derive(Debug, Clone)]
pub struct HfConnector {
    api_base: String,
}

impl HfConnector {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }
}

impl Connector for HfConnector {
    fn connect(&self, model: &str, credential: &Credential) -> Result<SwarmClient> {
        SwarmClient::with_api_base(model, Some(credential.clone()), &self.api_base)
    }
}

enum Stage {
    Start(SwarmRequest),
    Streaming {
        snapshots: SnapshotStream,
        task: String,
        response_length: usize,
        started: Instant,
    },
    Finished,
}

#[derive(Clone)]
pub struct SwarmRunner {
    config: Arc<SwarmConfig>,
    logger: SwarmLogger,
    connector: Arc<dyn Connector>,
}

impl SwarmRunner {
    pub fn new(config: SwarmConfig, logger: SwarmLogger) -> Self {
        let connector = Arc::new(HfConnector::new(config.api_base.clone()));
        Self {
            config: Arc::new(config),
            logger,
            connector,
        }
    }

    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    /// Display lines for one request: the banner, then each accumulated
    /// snapshot, or a single failure line. Lazy; nothing runs until polled.
    pub fn run(&self, request: SwarmRequest) -> BoxStream<'static, String> {
        let runner = self.clone();
        stream::unfold(Stage::Start(request), move |stage| {
            let runner = runner.clone();
            async move { runner.advance(stage).await }
        })
        .boxed()
    }

    async fn advance(&self, stage: Stage) -> Option<(String, Stage)> {
        match stage {
            Stage::Start(request) => match self.prepare(&request) {
                Ok(snapshots) => {
                    self.logger.log_swarm_start(&request.task, &request.model);
                    Some((
                        BANNER.to_string(),
                        Stage::Streaming {
                            snapshots,
                            task: request.task,
                            response_length: 0,
                            started: Instant::now(),
                        },
                    ))
                }
                Err(line) => Some((line, Stage::Finished)),
            },
            Stage::Streaming {
                mut snapshots,
                task,
                response_length,
                started,
            } => match snapshots.next().await {
                Some(Ok(snapshot)) => {
                    let response_length = snapshot.chars().count();
                    Some((
                        snapshot,
                        Stage::Streaming {
                            snapshots,
                            task,
                            response_length,
                            started,
                        },
                    ))
                }
                Some(Err(error)) => Some((self.stream_failure(error, &task), Stage::Finished)),
                None => {
                    self.logger
                        .log_swarm_complete(response_length, started.elapsed());
                    None
                }
            },
            Stage::Finished => None,
        }
    }

    /// Runs every check that precedes the network call.
    fn prepare(&self, request: &SwarmRequest) -> std::result::Result<SnapshotStream, String> {
        validate_task(&request.task).map_err(|e| failure_line(&e.reason))?;
        validate_temperature(request.temperature).map_err(|e| failure_line(&e.reason))?;
        validate_max_tokens(request.max_tokens).map_err(|e| failure_line(&e.reason))?;

        let credential = self.config.validate_token().map_err(|e| {
            let message = e.message();
            self.logger.log_error(e.kind(), &message, Some(&request.task));
            failure_line(&format!("Error: {}", message))
        })?;

        let params = request.parameters();
        let client = self
            .connector
            .connect(&params.model, credential)
            .map_err(|e| {
                let message = format!("Failed to initialize client: {}", e.message());
                self.logger
                    .log_error("ConfigurationError", &message, Some(&request.task));
                failure_line(&message)
            })?;

        let prompt = build_swarm_prompt(&request.task);

        Ok(client.stream_swarm_response(&prompt, params.max_tokens, params.temperature))
    }

    fn stream_failure(&self, error: SwarmError, task: &str) -> String {
        match error {
            SwarmError::Api(detail) => {
                let message = format!("API error: {}", detail);
                self.logger.log_error("APIError", &message, Some(task));
                format!("{}{}", failure_line(&message), API_FAILURE_HINT)
            }
            other => {
                let message = format!("Unexpected error: {}", other.message());
                self.logger.log_error("UnexpectedError", &message, Some(task));
                format!("{}{}", failure_line(&message), UNEXPECTED_FAILURE_HINT)
            }
        }
    }
}
