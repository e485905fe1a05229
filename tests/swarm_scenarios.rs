use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use swarmmaster::{
    swarm::{API_FAILURE_HINT, UNEXPECTED_FAILURE_HINT},
    ChatBackend, ChatCompletionRequest, Connector, Credential, DeltaStream, Result, SwarmClient,
    SwarmConfig, SwarmError, SwarmLogger, SwarmRequest, SwarmRunner, BANNER, FAILURE_GLYPH,
};

/// Plays back a fixed delta sequence and records the requests it saw.
struct ScriptedBackend {
    script: Mutex<Vec<Result<Option<String>>>>,
    requests: Mutex<Vec<ChatCompletionRequest>>,
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn open_stream(&self, request: ChatCompletionRequest) -> Result<DeltaStream> {
        self.requests.lock().unwrap().push(request);
        let script = std::mem::take(&mut *self.script.lock().unwrap());
        Ok(Box::pin(stream::iter(script)))
    }
}

struct ScriptedConnector {
    backend: Arc<ScriptedBackend>,
    connects: AtomicUsize,
}

impl Connector for ScriptedConnector {
    fn connect(&self, model: &str, _credential: &Credential) -> Result<SwarmClient> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(SwarmClient::with_backend(model, self.backend.clone()))
    }
}

fn connector(script: Vec<Result<Option<String>>>) -> Arc<ScriptedConnector> {
    Arc::new(ScriptedConnector {
        backend: Arc::new(ScriptedBackend {
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
        }),
        connects: AtomicUsize::new(0),
    })
}

fn delta(text: &str) -> Result<Option<String>> {
    Ok(Some(text.to_string()))
}

fn runner(
    config: SwarmConfig,
    connector: Arc<ScriptedConnector>,
) -> (SwarmRunner, Arc<swarmmaster::MemorySink>) {
    let (logger, sink) = SwarmLogger::in_memory();
    (SwarmRunner::new(config, logger).with_connector(connector), sink)
}

fn valid_request() -> SwarmRequest {
    SwarmRequest::new("Design a viral AI tool", "meta-llama/Meta-Llama-3.1-70B-Instruct")
        .with_temperature(0.7)
        .with_max_tokens(4096)
}

#[tokio::test]
async fn empty_task_yields_one_failure_line_without_network() {
    let connector = connector(vec![delta("never")]);
    let (runner, sink) = runner(SwarmConfig::new().with_token("hf_test"), connector.clone());

    let lines: Vec<String> = runner
        .run(SwarmRequest::new("", "any-model"))
        .collect()
        .await;

    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with(FAILURE_GLYPH));
    assert!(lines[0].to_lowercase().contains("task"));
    assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
    assert!(sink.entries().is_empty());
}

#[tokio::test]
async fn whitespace_task_is_rejected() {
    let connector = connector(vec![]);
    let (runner, _sink) = runner(SwarmConfig::new().with_token("hf_test"), connector);

    let lines: Vec<String> = runner
        .run(SwarmRequest::new("   ", "any-model"))
        .collect()
        .await;

    assert_eq!(lines, vec!["❌ Task cannot be empty or only whitespace."]);
}

#[tokio::test]
async fn successful_run_streams_banner_then_snapshots() {
    let connector = connector(vec![delta("🚀")]);
    let (runner, sink) = runner(SwarmConfig::new().with_token("hf_test"), connector.clone());

    let lines: Vec<String> = runner.run(valid_request()).collect().await;

    assert_eq!(lines, vec![BANNER.to_string(), "🚀".to_string()]);
    assert_eq!(sink.events(), vec!["swarm_start", "swarm_complete"]);

    let complete = &sink.entries()[1];
    assert!(complete.message.contains("Response length: 1 chars"));

    let requests = connector.backend.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].max_tokens, 4096);
    assert_eq!(requests[0].temperature, 0.7);
    assert!(requests[0].messages[0]
        .content
        .contains("Task: Design a viral AI tool"));
}

#[tokio::test]
async fn snapshots_accumulate_and_skip_empty_deltas() {
    let connector = connector(vec![delta("Hello"), delta(""), delta(" World"), Ok(None), delta("!")]);
    let (runner, _sink) = runner(SwarmConfig::new().with_token("hf_test"), connector);

    let lines: Vec<String> = runner.run(valid_request()).collect().await;

    assert_eq!(lines, vec![BANNER, "Hello", "Hello World", "Hello World!"]);
}

#[tokio::test]
async fn missing_credential_stops_before_client_construction() {
    let connector = connector(vec![delta("never")]);
    let (runner, sink) = runner(SwarmConfig::new().without_token(), connector.clone());

    let lines: Vec<String> = runner.run(valid_request()).collect().await;

    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with(FAILURE_GLYPH));
    assert!(lines[0].contains("not set"));
    assert_eq!(connector.connects.load(Ordering::SeqCst), 0);

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].event(), Some("error"));
    assert!(entries[0].message.contains("ConfigurationError"));
    assert!(!entries[0].message.contains("Design a viral AI tool"));
}

#[tokio::test]
async fn api_failure_mid_stream_keeps_partial_output() {
    let connector = connector(vec![
        delta("Agent 1: Working"),
        Err(SwarmError::Api("Connection reset".into())),
        delta("never reached"),
    ]);
    let (runner, sink) = runner(SwarmConfig::new().with_token("hf_test"), connector);

    let lines: Vec<String> = runner.run(valid_request()).collect().await;

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], BANNER);
    assert_eq!(lines[1], "Agent 1: Working");
    assert!(lines[2].starts_with(FAILURE_GLYPH));
    assert!(lines[2].contains("API error"));
    assert!(lines[2].contains("Connection reset"));
    assert!(lines[2].ends_with(API_FAILURE_HINT));

    assert_eq!(sink.events(), vec!["swarm_start", "error"]);
    assert!(sink.entries()[1].message.contains("APIError"));
}

#[tokio::test]
async fn local_fault_mid_stream_is_reported_as_unexpected() {
    let connector = connector(vec![Err(SwarmError::Unexpected("decoder state lost".into()))]);
    let (runner, sink) = runner(SwarmConfig::new().with_token("hf_test"), connector);

    let lines: Vec<String> = runner.run(valid_request()).collect().await;

    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[1],
        format!(
            "❌ Unexpected error: decoder state lost{}",
            UNEXPECTED_FAILURE_HINT
        )
    );
    assert!(sink.entries()[1].message.contains("UnexpectedError"));
}

#[tokio::test]
async fn logs_never_contain_credential_or_task() {
    let connector = connector(vec![delta("fine")]);
    let (runner, sink) = runner(
        SwarmConfig::new().with_token("hf_super_secret"),
        connector,
    );

    let _: Vec<String> = runner.run(valid_request()).collect().await;

    for entry in sink.entries() {
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("hf_super_secret"));
        assert!(!json.contains("Design a viral AI tool"));
    }
}

#[tokio::test]
async fn caller_can_stop_consuming_early() {
    let connector = connector(vec![delta("a"), delta("b"), delta("c")]);
    let (runner, sink) = runner(SwarmConfig::new().with_token("hf_test"), connector);

    let lines: Vec<String> = runner.run(valid_request()).take(2).collect().await;

    assert_eq!(lines, vec![BANNER, "a"]);
    assert_eq!(sink.events(), vec!["swarm_start"]);
}

/// Accepts one connection, drains the request and replies with `response`.
async fn reply_once(response: &'static str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let api_base = format!("http://{}/v1", listener.local_addr().unwrap());

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let head_end = request.windows(4).position(|w| w == b"\r\n\r\n");
            let done = head_end.map_or(false, |end| {
                let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                request.len() >= end + 4 + length
            });
            if n == 0 || done {
                break;
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    api_base
}

#[tokio::test]
async fn rejected_credential_over_http_reports_api_error() {
    let api_base = reply_once(
        "HTTP/1.1 401 Unauthorized\r\nContent-Length: 9\r\nConnection: close\r\n\r\nbad token",
    )
    .await;
    let (logger, sink) = SwarmLogger::in_memory();
    let runner = SwarmRunner::new(
        SwarmConfig::new()
            .with_token("hf_rejected")
            .with_api_base(api_base),
        logger,
    );

    let lines: Vec<String> = runner.run(valid_request()).collect().await;

    assert_eq!(
        lines,
        vec![
            BANNER.to_string(),
            format!(
                "{} API error: Failed to stream response: HTTP 401 Unauthorized: bad token{}",
                FAILURE_GLYPH, API_FAILURE_HINT
            ),
        ]
    );
    assert_eq!(sink.events(), vec!["swarm_start", "error"]);
}
