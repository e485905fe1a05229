pub mod config;
pub mod error;
pub mod export;
pub mod inference;
pub mod logger;
pub mod models;
pub mod prompts;
#[cfg(feature = "server")]
pub mod server;
pub mod swarm;
pub mod validation;

pub use config::{Credential, ServerConfig, SwarmConfig, AVAILABLE_MODELS};
pub use error::{Result, SwarmError, ValidationError};
pub use export::{export_filename, format_export_content, last_response};
pub use inference::{accumulate, ChatBackend, DeltaStream, HfInferenceBackend, SwarmClient};
pub use logger::{LogSink, MemorySink, SwarmLogger};
pub use models::{ChatCompletionRequest, ChatTurn, GenerationParameters, SwarmRequest};
pub use prompts::build_swarm_prompt;
pub use swarm::{Connector, HfConnector, SwarmRunner, BANNER, FAILURE_GLYPH};
