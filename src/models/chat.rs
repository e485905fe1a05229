use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of a streaming chat-completion call.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub stream: bool,
}

impl ChatCompletionRequest {
    pub fn streaming(
        model: impl Into<String>,
        prompt: impl Into<String>,
        max_tokens: u32,
        temperature: f64,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens,
            temperature,
            stream: true,
        }
    }
}

/// One `data:` event of the completion stream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    /// Set when the endpoint reports a failure inside the stream.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|error| match error {
            serde_json::Value::String(msg) => msg.clone(),
            other => other
                .get("message")
                .and_then(|m| m.as_str())
                .map(String::from)
                .unwrap_or_else(|| other.to_string()),
        })
    }

    /// Text fragment of the first choice, if any.
    pub fn into_delta(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.delta.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_payload_shape() {
        let request = ChatCompletionRequest::streaming("google/gemma-7b-it", "hi", 2048, 0.9);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["stream"], true);
        assert_eq!(json["max_tokens"], 2048);
        assert_eq!(json["temperature"], 0.9);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_chunk_delta_extraction() {
        let chunk: ChatCompletionChunk = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"delta":{"role":"assistant","content":"Hello"}}]}"#,
        )
        .unwrap();
        assert_eq!(chunk.into_delta().as_deref(), Some("Hello"));

        let empty: ChatCompletionChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#).unwrap();
        assert_eq!(empty.into_delta(), None);

        let no_choices: ChatCompletionChunk = serde_json::from_str(r#"{"usage":{}}"#).unwrap();
        assert_eq!(no_choices.into_delta(), None);
    }

    #[test]
    fn test_chunk_error_message() {
        let plain: ChatCompletionChunk =
            serde_json::from_str(r#"{"error":"Model is overloaded"}"#).unwrap();
        assert_eq!(plain.error_message().as_deref(), Some("Model is overloaded"));

        let nested: ChatCompletionChunk =
            serde_json::from_str(r#"{"error":{"message":"Rate limited","code":429}}"#).unwrap();
        assert_eq!(nested.error_message().as_deref(), Some("Rate limited"));
    }
}
