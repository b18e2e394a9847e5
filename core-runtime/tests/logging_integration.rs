//! Global subscriber installation and host mirroring.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge_traits::error::Result as SinkResult;
use bridge_traits::logging::{LogEntry, LogLevel, LoggerSink};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};

#[derive(Default)]
struct CapturingSink {
    entries: Mutex<Vec<LogEntry>>,
}

#[async_trait]
impl LoggerSink for CapturingSink {
    async fn log(&self, entry: LogEntry) -> SinkResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

// One test owns the process-wide subscriber; splitting it would race.
#[test]
fn test_init_logging_once_and_mirror_to_host() {
    let sink = Arc::new(CapturingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_logger_sink(sink.clone());

    init_logging(config.clone()).unwrap();
    assert!(init_logging(config).is_err());

    let span = tracing::info_span!(target: "core_service", "bridge_call", module = "RNZcash");
    span.in_scope(|| {
        tracing::debug!(target: "core_service::transactions", password = "hunter2", "Resolving");
        tracing::debug!(target: "hyper::proto", "filtered out by the default directives");
    });

    let entries = sink.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "Resolving");
    assert_eq!(entries[0].fields.get("module"), Some(&"RNZcash".to_string()));
    assert_eq!(entries[0].fields.get("password"), Some(&"[REDACTED]".to_string()));
}

#[test]
fn test_format_default_depends_on_profile() {
    #[cfg(debug_assertions)]
    assert_eq!(LoggingConfig::default().format, LogFormat::Pretty);

    #[cfg(not(debug_assertions))]
    assert_eq!(LoggingConfig::default().format, LogFormat::Json);
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Json)
        .with_level_name("warn")
        .unwrap()
        .with_filter("core_service=trace")
        .with_secret_redaction(false)
        .with_spans(false);

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, LogLevel::Warn);
    assert_eq!(config.filter.as_deref(), Some("core_service=trace"));
    assert!(!config.redact_secrets);
    assert!(!config.enable_spans);
}
