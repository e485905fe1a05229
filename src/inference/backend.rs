use crate::{
    config::Credential,
    error::{Result, SwarmError},
    inference::sse::{SseEvent, SseParser},
    models::{ChatCompletionChunk, ChatCompletionRequest},
};
use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use reqwest::Client;
use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;

/// Raw text fragments from the endpoint; `None` marks an event without text.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<Option<String>>> + Send>>;

/// A chat-completion endpoint that can stream its answer.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn open_stream(&self, request: ChatCompletionRequest) -> Result<DeltaStream>;
}

/// OpenAI-compatible chat-completions endpoint of the Hugging Face router.
#[derive(Clone)]
pub struct HfInferenceBackend {
    http: Client,
    endpoint: String,
    credential: Credential,
}

impl HfInferenceBackend {
    pub fn new(api_base: &str, credential: Credential) -> Result<Self> {
        let http = Client::builder().build().map_err(|e| {
            SwarmError::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            credential,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for HfInferenceBackend {
    async fn open_stream(&self, request: ChatCompletionRequest) -> Result<DeltaStream> {
        log::info!("Invoking streaming model: {}", request.model);
        log::debug!(
            "Chat completion request: max_tokens={}, temperature={}",
            request.max_tokens,
            request.temperature
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.credential.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| SwarmError::Api(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SwarmError::Api(format!("HTTP {}: {}", status, body)));
        }

        Ok(Box::pin(decode_event_stream(response.bytes_stream())))
    }
}

struct EventDecoder<S> {
    bytes: Pin<Box<S>>,
    parser: SseParser,
    pending: VecDeque<Result<Option<String>>>,
    finished: bool,
}

impl<S> EventDecoder<S> {
    /// Queues the payload of `event`; returns false once the stream is over.
    fn push_event(&mut self, event: SseEvent) -> bool {
        let data = event.data.trim();
        if data == "[DONE]" {
            return false;
        }

        if event.event.as_deref() == Some("error") {
            let message = serde_json::from_str::<ChatCompletionChunk>(data)
                .ok()
                .and_then(|chunk| chunk.error_message())
                .unwrap_or_else(|| data.to_string());
            self.pending.push_back(Err(SwarmError::Api(message)));
            return false;
        }

        let item = serde_json::from_str::<ChatCompletionChunk>(data)
            .map_err(SwarmError::from)
            .and_then(|chunk| match chunk.error_message() {
                Some(msg) => Err(SwarmError::Api(msg)),
                None => Ok(chunk.into_delta()),
            });
        let keep_going = item.is_ok();
        self.pending.push_back(item);
        keep_going
    }
}

/// Turns a chat-completion SSE body into text deltas. Ends at `[DONE]`, at
/// the end of the body, or right after the first error.
pub fn decode_event_stream<S, B, E>(bytes: S) -> impl Stream<Item = Result<Option<String>>> + Send
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Display + Send,
{
    let decoder = EventDecoder {
        bytes: Box::pin(bytes),
        parser: SseParser::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(decoder, |mut decoder| async move {
        loop {
            if let Some(item) = decoder.pending.pop_front() {
                if item.is_err() {
                    decoder.pending.clear();
                    decoder.finished = true;
                }
                return Some((item, decoder));
            }

            if decoder.finished {
                return None;
            }

            match decoder.bytes.next().await {
                Some(Ok(chunk)) => {
                    for event in decoder.parser.feed(chunk.as_ref()) {
                        if !decoder.push_event(event) {
                            decoder.finished = true;
                            break;
                        }
                    }
                }
                Some(Err(e)) => {
                    decoder.finished = true;
                    decoder.pending.push_back(Err(SwarmError::Api(e.to_string())));
                }
                None => {
                    decoder.finished = true;
                    if let Some(event) = decoder.parser.finish() {
                        decoder.push_event(event);
                    }
                }
            }
        }
    })
}
