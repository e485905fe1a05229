use crate::{
    config::{Credential, DEFAULT_API_BASE},
    error::{Result, SwarmError},
    inference::backend::{ChatBackend, HfInferenceBackend},
    models::ChatCompletionRequest,
};
use futures::future;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use std::pin::Pin;
use std::sync::Arc;

/// Accumulated text after each non-empty delta.
pub type SnapshotStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Streaming chat client bound to one model and one credential.
#[derive(Clone)]
pub struct SwarmClient {
    model: String,
    backend: Arc<dyn ChatBackend>,
}

impl SwarmClient {
    /// Uses `token`, or `HF_TOKEN` when none is given.
    pub fn new(model: impl Into<String>, token: Option<Credential>) -> Result<Self> {
        Self::with_api_base(model, token, DEFAULT_API_BASE)
    }

    pub fn with_api_base(
        model: impl Into<String>,
        token: Option<Credential>,
        api_base: &str,
    ) -> Result<Self> {
        let credential = token.or_else(Credential::from_env).ok_or_else(|| {
            SwarmError::Configuration(
                "HF_TOKEN not set. Please configure your Hugging Face token.".to_string(),
            )
        })?;
        let backend = HfInferenceBackend::new(api_base, credential)?;

        Ok(Self::with_backend(model, Arc::new(backend)))
    }

    pub fn with_backend(model: impl Into<String>, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            model: model.into(),
            backend,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Streams the answer to `prompt`. Nothing is sent until the returned
    /// stream is first polled, and it can be consumed only once.
    pub fn stream_swarm_response(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> SnapshotStream {
        let request =
            ChatCompletionRequest::streaming(&self.model, prompt, max_tokens, temperature);
        let backend = self.backend.clone();

        let deltas = stream::once(async move { backend.open_stream(request).await })
            .try_flatten()
            .map_err(wrap_remote_failure);

        Box::pin(accumulate(deltas))
    }
}

/// Remote and transport failures become one API failure. Local faults
/// keep their kind.
fn wrap_remote_failure(error: SwarmError) -> SwarmError {
    match error {
        SwarmError::Unexpected(_) => error,
        other => SwarmError::Api(format!("Failed to stream response: {}", other.message())),
    }
}

/// Running concatenation of the non-empty deltas. Empty or absent deltas
/// yield nothing; the stream ends right after the first error.
pub fn accumulate<S>(deltas: S) -> impl Stream<Item = Result<String>>
where
    S: Stream<Item = Result<Option<String>>>,
{
    deltas
        .scan((String::new(), false), |(accumulated, failed), item| {
            if *failed {
                return future::ready(None);
            }
            let step = match item {
                Ok(Some(delta)) if !delta.is_empty() => {
                    accumulated.push_str(&delta);
                    Some(Ok(accumulated.clone()))
                }
                Ok(_) => None,
                Err(e) => {
                    *failed = true;
                    Some(Err(e))
                }
            };
            future::ready(Some(step))
        })
        .filter_map(future::ready)
}
