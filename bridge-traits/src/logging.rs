//! Host log forwarding.
//!
//! The core mirrors its `tracing` output into the host's native log (os_log on
//! iOS, Logcat on Android) through a [`LoggerSink`]. Records carry the fields
//! of every enclosing span, so a host log line for a bridge call includes its
//! `module`, `method` and `call_id`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// `android.util.Log` priority (VERBOSE = 2 .. ERROR = 6).
    pub fn logcat_priority(&self) -> i32 {
        match self {
            LogLevel::Trace => 2,
            LogLevel::Debug => 3,
            LogLevel::Info => 4,
            LogLevel::Warn => 5,
            LogLevel::Error => 6,
        }
    }

    /// Single-letter Logcat prefix (`V`, `D`, `I`, `W`, `E`).
    pub fn logcat_letter(&self) -> char {
        match self {
            LogLevel::Trace => 'V',
            LogLevel::Debug => 'D',
            LogLevel::Info => 'I',
            LogLevel::Warn => 'W',
            LogLevel::Error => 'E',
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the level names hosts put in their config (`"debug"`, `"WARN"`,
/// `"verbose"`).
impl FromStr for LogLevel {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" | "verbose" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(BridgeError::InvalidArgument(format!(
                "unknown log level '{}'",
                other
            ))),
        }
    }
}

/// One log record handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    /// `tracing` target, e.g. `core_service::transactions`.
    pub target: String,
    pub message: String,
    /// Event fields merged over the fields of its enclosing spans.
    pub fields: BTreeMap<String, String>,
    /// Name of the innermost span, if any.
    pub span: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            target: target.into(),
            message: message.into(),
            fields: BTreeMap::new(),
            span: None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_span(mut self, span: impl Into<String>) -> Self {
        self.span = Some(span.into());
        self
    }

    /// Host log tag: the crate part of the target.
    pub fn tag(&self) -> &str {
        self.target.split("::").next().unwrap_or(&self.target)
    }

    /// The bridge call this record belongs to, if logged inside one.
    pub fn call_id(&self) -> Option<&str> {
        self.fields.get("call_id").map(String::as_str)
    }
}

/// Receives log records mirrored from the core.
///
/// Secret-looking fields are redacted before records reach a sink unless
/// redaction was explicitly disabled.
#[async_trait::async_trait]
pub trait LoggerSink: Send + Sync {
    async fn log(&self, entry: LogEntry) -> Result<()>;

    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Records below this level are never built.
    fn min_level(&self) -> LogLevel {
        LogLevel::Info
    }
}

/// Prints Logcat-style lines to stdout; for simulators and desktop test hosts.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    pub min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    /// `12:00:00.000 W/core_service: message [call_id=.. module=..]`
    pub fn render(entry: &LogEntry) -> String {
        let mut line = format!(
            "{} {}/{}: {}",
            entry.timestamp.format("%H:%M:%S%.3f"),
            entry.level.logcat_letter(),
            entry.tag(),
            entry.message
        );

        if !entry.fields.is_empty() {
            let fields: Vec<String> = entry
                .fields
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            line.push_str(&format!(" [{}]", fields.join(" ")));
        }

        line
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

#[async_trait::async_trait]
impl LoggerSink for ConsoleLogger {
    async fn log(&self, entry: LogEntry) -> Result<()> {
        if entry.level >= self.min_level {
            println!("{}", Self::render(&entry));
        }
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry() -> LogEntry {
        let mut entry = LogEntry::new(
            LogLevel::Warn,
            "core_service::transactions",
            "Rejecting",
        )
        .with_field("module", "RNZcash")
        .with_field("call_id", "7f1c")
        .with_span("bridge_call");
        entry.timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        entry
    }

    #[test]
    fn test_entry_accessors() {
        let entry = entry();
        assert_eq!(entry.tag(), "core_service");
        assert_eq!(entry.call_id(), Some("7f1c"));
        assert_eq!(entry.span.as_deref(), Some("bridge_call"));

        let bare = LogEntry::new(LogLevel::Info, "bridge_traits", "ready");
        assert_eq!(bare.tag(), "bridge_traits");
        assert_eq!(bare.call_id(), None);
    }

    #[test]
    fn test_render_is_logcat_style() {
        assert_eq!(
            ConsoleLogger::render(&entry()),
            "12:00:00.000 W/core_service: Rejecting [call_id=7f1c module=RNZcash]"
        );
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!(" WARNING ".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("verbose".parse::<LogLevel>(), Ok(LogLevel::Trace));

        let err = "loud".parse::<LogLevel>().unwrap_err();
        assert_eq!(err.code(), "Err");
    }

    #[test]
    fn test_level_ordering_matches_logcat() {
        let levels = [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ];
        for pair in levels.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].logcat_priority() < pair[1].logcat_priority());
        }
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[tokio::test]
    async fn test_console_logger_accepts_entries() {
        let logger = ConsoleLogger::new(LogLevel::Debug);
        logger.log(entry()).await.unwrap();
        logger.flush().await.unwrap();
        assert_eq!(logger.min_level(), LogLevel::Debug);
    }
}
