//! HTTP surface for the chat page: deploy, export, model list, health.

mod page;

use crate::{
    config::ServerConfig,
    export::{export_filename, format_export_content, last_response},
    models::{ChatTurn, SwarmRequest},
    swarm::{failure_line, SwarmRunner},
    validation::{max_tokens_from_value, temperature_from_value, validate_model, validate_task},
};
use actix_web::{http::header, web, App, HttpResponse, HttpServer};
use futures::stream::{self, BoxStream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use std::convert::Infallible;

pub struct AppState {
    pub runner: SwarmRunner,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeployForm {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<Value>,
    #[serde(default)]
    pub max_tokens: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportForm {
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(default)]
    pub temperature: Option<Value>,
    #[serde(default)]
    pub max_tokens: Option<Value>,
}

impl AppState {
    pub fn new(runner: SwarmRunner) -> Self {
        Self { runner }
    }

    /// Checks the untyped form in deploy order and fills in defaults.
    fn swarm_request(&self, form: DeployForm) -> Result<SwarmRequest, String> {
        let config = self.runner.config();
        let task = form.task.unwrap_or_default();
        validate_task(&task).map_err(|e| e.reason)?;

        let temperature = match &form.temperature {
            Some(value) => temperature_from_value(value).map_err(|e| e.reason)?,
            None => config.temperature,
        };
        let max_tokens = match &form.max_tokens {
            Some(value) => max_tokens_from_value(value).map_err(|e| e.reason)?,
            None => config.max_tokens,
        };

        let model = form.model.unwrap_or_else(|| config.model.clone());
        validate_model(&model, &config.available_models).map_err(|e| e.reason)?;

        Ok(SwarmRequest {
            task,
            model,
            temperature,
            max_tokens,
        })
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health))
        .route("/api/models", web::get().to(models))
        .route("/api/swarm", web::post().to(deploy))
        .route("/api/export", web::post().to(export));
}

pub async fn serve(runner: SwarmRunner, server: ServerConfig) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(runner));

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((server.host.as_str(), server.port))?
        .run()
        .await
}

/// One server-sent event carrying a display line as a JSON string.
pub fn sse_frame(line: &str) -> String {
    format!("data: {}\n\n", Value::String(line.to_string()))
}

async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page::INDEX_HTML)
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

async fn models(state: web::Data<AppState>) -> HttpResponse {
    let config = state.runner.config();
    HttpResponse::Ok().json(json!({
        "models": config.available_models,
        "default_model": config.model,
        "default_temperature": config.temperature,
        "default_max_tokens": config.max_tokens,
    }))
}

async fn deploy(state: web::Data<AppState>, form: web::Json<DeployForm>) -> HttpResponse {
    let lines: BoxStream<'static, String> = match state.swarm_request(form.into_inner()) {
        Ok(request) => state.runner.run(request),
        Err(reason) => stream::once(async move { failure_line(&reason) }).boxed(),
    };

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(lines.map(|line| Ok::<_, Infallible>(web::Bytes::from(sse_frame(&line)))))
}

async fn export(state: web::Data<AppState>, form: web::Json<ExportForm>) -> HttpResponse {
    let form = form.into_inner();
    let response = match form.response.filter(|r| !r.is_empty()) {
        Some(response) => response,
        None => last_response(&form.history),
    };
    let model = form
        .model
        .unwrap_or_else(|| state.runner.config().model.clone());
    let shown = |value: Option<Value>| match value {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => "N/A".to_string(),
        Some(other) => other.to_string(),
    };
    let metadata = [
        ("Temperature", shown(form.temperature)),
        ("Max Tokens", shown(form.max_tokens)),
    ];

    let content = format_export_content(&form.task, &response, &model, metadata);
    let filename = export_filename(None);

    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(content)
}
