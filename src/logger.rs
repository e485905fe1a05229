use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, Metadata, Record};
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Target used for every swarm lifecycle record.
pub const LOG_TARGET: &str = "swarmmaster";

/// Longest error message prefix that reaches the log.
pub const MAX_ERROR_MESSAGE_CHARS: usize = 100;

static CONSOLE_LOGGER: Lazy<ConsoleLogger> = Lazy::new(ConsoleLogger::new);
static INSTALLED: OnceCell<()> = OnceCell::new();

/// Installs the console backend for the `log` facade. Only the first call
/// takes effect; later calls return `Ok` and leave the backend untouched.
pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    INSTALLED.get_or_try_init(|| {
        let max_level = config.min_level.to_log_level_filter();
        CONSOLE_LOGGER.update_config(config);
        log::set_logger(&*CONSOLE_LOGGER)
            .map_err(|e| format!("Failed to set logger: {:?}", e))?;
        log::set_max_level(max_level);
        Ok::<(), String>(())
    })?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Trace => "🔍",
            LogLevel::Debug => "🐛",
            LogLevel::Info => "💡",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    pub fn to_log_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::Trace,
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }

    pub fn to_log_level_filter(&self) -> log::LevelFilter {
        self.to_log_level().to_level_filter()
    }

    pub fn from_log_level(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

/// Structured log entry. Carries lengths and identifiers only; never task
/// text or credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub target: String,
    pub context: BTreeMap<String, serde_json::Value>,
    pub duration_ms: Option<u64>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level,
            message: message.into(),
            target: target.into(),
            context: BTreeMap::new(),
            duration_ms: None,
        }
    }

    pub fn with_context(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(duration.as_millis() as u64);
        self
    }

    /// The `event` context field, if present.
    pub fn event(&self) -> Option<&str> {
        self.context.get("event").and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_target: bool,
    pub include_timestamp: bool,
    pub timestamp_format: String,
    pub output_json: bool,
    pub custom_prefix: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_emojis: true,
            show_target: true,
            include_timestamp: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            output_json: false,
            custom_prefix: None,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.custom_prefix = Some(prefix.into());
        self
    }

    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: false,
            show_emojis: false,
            output_json: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_colors: true,
            show_emojis: true,
            output_json: false,
            ..Default::default()
        }
    }

    /// `SWARM_LOG_FORMAT=json` selects the production layout,
    /// `SWARM_LOG_LEVEL` overrides the level.
    pub fn from_env() -> Self {
        let base = match std::env::var("SWARM_LOG_FORMAT").ok().as_deref() {
            Some("json") => Self::production(),
            _ => Self::default(),
        };
        match std::env::var("SWARM_LOG_LEVEL")
            .ok()
            .and_then(|l| LogLevel::parse(&l))
        {
            Some(level) => base.with_level(level),
            None => base,
        }
    }
}

/// Console backend behind the `log` facade.
pub struct ConsoleLogger {
    config: Mutex<LoggerConfig>,
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
        }
    }

    pub fn update_config(&self, new_config: LoggerConfig) {
        let mut config = self.config.lock().unwrap_or_else(|e| e.into_inner());
        *config = new_config;
    }

    fn format_console_output(&self, entry: &LogEntry, config: &LoggerConfig) -> String {
        let mut output = String::new();

        if let Some(prefix) = &config.custom_prefix {
            if config.show_colors {
                output.push_str(&format!("[{}] ", prefix.bright_white().bold()));
            } else {
                output.push_str(&format!("[{}] ", prefix));
            }
        }

        if config.include_timestamp {
            let timestamp = entry.timestamp.format(&config.timestamp_format).to_string();
            if config.show_colors {
                output.push_str(&format!("{} ", timestamp.bright_black()));
            } else {
                output.push_str(&format!("{} ", timestamp));
            }
        }

        let level_str = if config.show_emojis {
            format!("{} {}", entry.level.emoji(), entry.level.as_str())
        } else {
            entry.level.as_str().to_string()
        };

        if config.show_colors {
            output.push_str(&format!(
                "[{}] ",
                level_str.color(entry.level.color()).bold()
            ));
        } else {
            output.push_str(&format!("[{}] ", level_str));
        }

        if config.show_target && !entry.target.is_empty() {
            if config.show_colors {
                output.push_str(&format!("{} - ", entry.target.bright_blue()));
            } else {
                output.push_str(&format!("{} - ", entry.target));
            }
        }

        output.push_str(&entry.message);
        output
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match self.config.lock() {
            Ok(config) => metadata.level() <= config.min_level.to_log_level(),
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = LogEntry::new(
            LogLevel::from_log_level(record.level()),
            record.args().to_string(),
            record.target(),
        );

        if let Ok(config) = self.config.lock() {
            let line = if config.output_json {
                serde_json::to_string(&entry).unwrap_or_default()
            } else {
                self.format_console_output(&entry, &config)
            };
            println!("{}", line);
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

/// Destination for swarm lifecycle entries.
pub trait LogSink: Send + Sync {
    fn write(&self, entry: &LogEntry);
}

/// Forwards entries to the `log` facade under [`LOG_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FacadeSink;

impl LogSink for FacadeSink {
    fn write(&self, entry: &LogEntry) {
        let context = if entry.context.is_empty() {
            String::new()
        } else {
            format!(
                " {}",
                serde_json::to_string(&entry.context).unwrap_or_default()
            )
        };
        let duration = entry
            .duration_ms
            .map(|ms| format!(" [{}ms]", ms))
            .unwrap_or_default();

        log::log!(
            target: LOG_TARGET,
            entry.level.to_log_level(),
            "{}{}{}",
            entry.message,
            context,
            duration
        );
    }
}

/// Keeps every entry in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn events(&self) -> Vec<String> {
        self.entries()
            .iter()
            .filter_map(|e| e.event().map(String::from))
            .collect()
    }
}

impl LogSink for MemorySink {
    fn write(&self, entry: &LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry.clone());
    }
}

/// Swarm lifecycle logger handed to the orchestration entry point.
#[derive(Clone)]
pub struct SwarmLogger {
    sink: Arc<dyn LogSink>,
}

impl Default for SwarmLogger {
    fn default() -> Self {
        Self::new(Arc::new(FacadeSink))
    }
}

impl SwarmLogger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Logger backed by a fresh [`MemorySink`], returned alongside it.
    pub fn in_memory() -> (Self, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (Self::new(sink.clone()), sink)
    }

    pub fn log_swarm_start(&self, task: &str, model: &str) {
        let task_length = task.chars().count();
        let entry = LogEntry::new(
            LogLevel::Info,
            format!(
                "Swarm started - Model: {}, Task length: {} chars",
                model, task_length
            ),
            LOG_TARGET,
        )
        .with_context("event", "swarm_start")
        .with_context("model", model)
        .with_context("task_length", task_length);
        self.sink.write(&entry);
    }

    pub fn log_swarm_complete(&self, response_length: usize, elapsed: Duration) {
        let entry = LogEntry::new(
            LogLevel::Info,
            format!("Swarm completed - Response length: {} chars", response_length),
            LOG_TARGET,
        )
        .with_context("event", "swarm_complete")
        .with_context("response_length", response_length)
        .with_duration(elapsed);
        self.sink.write(&entry);
    }

    pub fn log_error(&self, error_type: &str, error_message: &str, task: Option<&str>) {
        let message = truncate_chars(error_message, MAX_ERROR_MESSAGE_CHARS);
        let task_length = task.filter(|t| !t.is_empty()).map(|t| t.chars().count());
        let task_info = task_length
            .map(|n| format!(", Task length: {} chars", n))
            .unwrap_or_default();

        let mut entry = LogEntry::new(
            LogLevel::Error,
            format!(
                "Error - Type: {}, Message: {}{}",
                error_type, message, task_info
            ),
            LOG_TARGET,
        )
        .with_context("event", "error")
        .with_context("error_type", error_type);
        if let Some(n) = task_length {
            entry = entry.with_context("task_length", n);
        }
        self.sink.write(&entry);
    }

    /// Records a setting change. Values of token-like settings are masked.
    pub fn log_config_change(&self, setting: &str, old_value: Option<&str>, new_value: Option<&str>) {
        let secret = setting.to_ascii_lowercase().contains("token");
        let shown = |value: Option<&str>| match value {
            Some(_) if secret => "***".to_string(),
            Some(v) => v.to_string(),
            None => "unset".to_string(),
        };

        let entry = LogEntry::new(
            LogLevel::Info,
            format!(
                "Config changed - {}: {} -> {}",
                setting,
                shown(old_value),
                shown(new_value)
            ),
            LOG_TARGET,
        )
        .with_context("event", "config_change")
        .with_context("setting", setting);
        self.sink.write(&entry);
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn log_startup_info(app_name: &str, version: &str, address: &str) {
    log::info!("🚀 Starting {} v{}", app_name, version);
    log::info!("🌐 Server will run on http://{}", address);
}

pub fn log_config_info(config: &crate::config::SwarmConfig) {
    log::info!("⚙️  Configuration loaded:");
    log::info!("   Model: {}", config.model);
    log::info!("   Max tokens: {}", config.max_tokens);
    log::info!("   Temperature: {}", config.temperature);
    log::info!("   Endpoint: {}", config.api_base);
    log::info!(
        "   HF_TOKEN: {}",
        if config.token.is_some() { "✅" } else { "❌" }
    );
}
