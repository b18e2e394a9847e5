//! # Logging & Tracing Infrastructure
//!
//! Structured logging on top of `tracing`:
//! - pretty, JSON and compact output
//! - a default filter scoped to the bridge crates
//! - mirroring into the host log through a [`LoggerSink`]
//! - redaction of wallet secrets before they leave the core
//!
//! ## Host mirroring
//!
//! [`LoggerSinkLayer`] records the fields of every span when it is created.
//! Each event is forwarded with those fields merged in, innermost span last,
//! so a rejection logged inside a `bridge_call` span reaches the host with its
//! `module`, `method` and `call_id`.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_traits::logging::{ConsoleLogger, LogLevel};
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//! use std::sync::Arc;
//!
//! let config = LoggingConfig::default()
//!     .with_format(LogFormat::Compact)
//!     .with_level(LogLevel::Debug)
//!     .with_logger_sink(Arc::new(ConsoleLogger::default()));
//!
//! init_logging(config).expect("Failed to initialize logging");
//! tracing::info!("Bridge started");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use bridge_traits::logging::{LogEntry, LogLevel, LoggerSink};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{
    filter::EnvFilter,
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer,
};

use crate::error::{Error, Result};

/// Crates whose events pass the default filter at the configured level.
const BRIDGE_CRATES: &[&str] = &[
    "bridge_traits",
    "core_runtime",
    "core_service",
    "zcash_bridge_workspace",
];

const SENSITIVE_FIELDS: &[&str] = &[
    "seed",
    "mnemonic",
    "spending_key",
    "viewing_key",
    "private_key",
    "password",
    "secret",
    "token",
];

const REDACTED: &str = "[REDACTED]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, colored; for development hosts.
    Pretty,
    /// One JSON object per line.
    Json,
    /// Single-line text.
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

#[derive(Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Level applied to the bridge crates by the default filter.
    pub level: LogLevel,
    /// Replaces the default filter entirely (`EnvFilter` syntax).
    pub filter: Option<String>,
    pub logger_sink: Option<Arc<dyn LoggerSink>>,
    pub redact_secrets: bool,
    /// Emit span enter/exit in text formats and span context in JSON.
    pub enable_spans: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            filter: None,
            logger_sink: None,
            redact_secrets: true,
            enable_spans: true,
        }
    }
}

impl fmt::Debug for LoggingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConfig")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("filter", &self.filter)
            .field("logger_sink", &self.logger_sink.as_ref().map(|_| "LoggerSink"))
            .field("redact_secrets", &self.redact_secrets)
            .field("enable_spans", &self.enable_spans)
            .finish()
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }

    pub fn with_secret_redaction(mut self, redact: bool) -> Self {
        self.redact_secrets = redact;
        self
    }

    pub fn with_spans(mut self, enable: bool) -> Self {
        self.enable_spans = enable;
        self
    }

    /// Applies a host-supplied level name such as `"debug"` or `"verbose"`.
    pub fn with_level_name(self, name: &str) -> Result<Self> {
        let level = name
            .parse::<LogLevel>()
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(self.with_level(level))
    }
}

/// Installs the global subscriber.
///
/// Only one subscriber can be installed per process; later calls fail with
/// [`Error::Config`].
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;
    let sink_layer = LoggerSinkLayer::new(config.logger_sink.clone(), config.redact_secrets);

    tracing_subscriber::registry()
        .with(filter)
        .with(sink_layer)
        .with(output_layer(&config))
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

fn output_layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let span_events = if config.enable_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let base = tracing_subscriber::fmt::layer().with_writer(io::stdout);

    match config.format {
        LogFormat::Pretty => base.pretty().with_span_events(span_events).boxed(),
        LogFormat::Compact => base.compact().with_span_events(span_events).boxed(),
        LogFormat::Json => base
            .json()
            .flatten_event(true)
            .with_current_span(config.enable_spans)
            .with_span_list(false)
            .boxed(),
    }
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let directives = match &config.filter {
        Some(custom) => custom.clone(),
        None => {
            let level = config.level.as_str();
            let scoped: Vec<String> = BRIDGE_CRATES
                .iter()
                .map(|krate| format!("{}={}", krate, level))
                .collect();
            format!("warn,{}", scoped.join(","))
        }
    };

    EnvFilter::try_new(&directives)
        .map_err(|e| Error::Config(format!("Invalid log filter '{}': {}", directives, e)))
}

/// Span fields captured at creation, stored in the span's extensions.
#[derive(Debug, Default)]
struct SpanFields(BTreeMap<String, String>);

/// Mirrors events into a [`LoggerSink`].
pub struct LoggerSinkLayer {
    sink: Option<Arc<dyn LoggerSink>>,
    redact_secrets: bool,
}

impl LoggerSinkLayer {
    pub fn new(sink: Option<Arc<dyn LoggerSink>>, redact_secrets: bool) -> Self {
        Self {
            sink,
            redact_secrets,
        }
    }

    fn scrub(&self, key: &str, value: String) -> String {
        if self.redact_secrets && is_sensitive(key) {
            REDACTED.to_string()
        } else {
            value
        }
    }

    fn dispatch(sink: Arc<dyn LoggerSink>, entry: LogEntry) {
        // Off-thread on the runtime when there is one, inline otherwise.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(err) = sink.log(entry).await {
                    eprintln!("LoggerSink error: {}", err);
                }
            });
        } else if let Err(err) = futures::executor::block_on(sink.log(entry)) {
            eprintln!("LoggerSink error: {}", err);
        }
    }
}

impl<S> Layer<S> for LoggerSinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        if self.sink.is_none() {
            return;
        }
        let Some(span) = ctx.span(id) else {
            return;
        };

        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);
        span.extensions_mut().insert(SpanFields(visitor.fields));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        let mut visitor = FieldVisitor::default();
        values.record(&mut visitor);

        let mut extensions = span.extensions_mut();
        if let Some(fields) = extensions.get_mut::<SpanFields>() {
            fields.0.extend(visitor.fields);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        let metadata = event.metadata();
        let level = host_level(metadata.level());
        if level < sink.min_level() {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let message = visitor
            .message
            .take()
            .unwrap_or_else(|| metadata.name().to_string());
        let mut entry = LogEntry::new(level, metadata.target(), message);

        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(fields) = span.extensions().get::<SpanFields>() {
                    for (key, value) in &fields.0 {
                        entry.fields.insert(key.clone(), self.scrub(key, value.clone()));
                    }
                }
                entry.span = Some(span.name().to_string());
            }
        }

        for (key, value) in visitor.fields {
            let value = self.scrub(&key, value);
            entry.fields.insert(key, value);
        }

        Self::dispatch(Arc::clone(sink), entry);
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: BTreeMap<String, String>,
}

impl FieldVisitor {
    fn put(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{:?}", value));
    }
}

fn host_level(level: &tracing::Level) -> LogLevel {
    match *level {
        tracing::Level::TRACE => LogLevel::Trace,
        tracing::Level::DEBUG => LogLevel::Debug,
        tracing::Level::INFO => LogLevel::Info,
        tracing::Level::WARN => LogLevel::Warn,
        tracing::Level::ERROR => LogLevel::Error,
    }
}

fn is_sensitive(field_name: &str) -> bool {
    let lower = field_name.to_ascii_lowercase();
    SENSITIVE_FIELDS.iter().any(|needle| lower.contains(needle))
}

/// Replaces the value of secret-looking fields with `[REDACTED]`.
///
/// ```
/// use core_runtime::logging::redact_if_sensitive;
///
/// assert_eq!(redact_if_sensitive("seed", "abandon abandon ..."), "[REDACTED]");
/// assert_eq!(redact_if_sensitive("alias", "wallet-1"), "wallet-1");
/// ```
pub fn redact_if_sensitive(field_name: &str, value: &str) -> String {
    if is_sensitive(field_name) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}
