//! Drives the bridge the way a host application would.
//!
//! Run with:
//! ```bash
//! # Plain variant
//! cargo run -p core-service --example bridge_demo
//!
//! # Notifying variant with a 500ms hold, JSON logs
//! cargo run -p core-service --example bridge_demo -- 500 json
//! ```

use std::env;
use std::time::{Duration, Instant};

use anyhow::Context;
use bridge_traits::LogLevel;
use core_runtime::config::{BridgeConfig, LEGACY_MODULE_NAME};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_service::{BridgeService, GET_NUM_TRANSACTIONS};
use serde_json::json;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let delay = args
        .get(1)
        .map(|raw| raw.parse::<u64>().context("delay must be a number of milliseconds"))
        .transpose()?
        .map(Duration::from_millis);

    let format = match args.get(2).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        _ => LogFormat::Pretty,
    };

    init_logging(
        LoggingConfig::default()
            .with_format(format)
            .with_level(LogLevel::Debug),
    )?;

    let mut builder = BridgeConfig::builder();
    if let Some(delay) = delay {
        builder = builder.notification_delay(delay);
    }
    let service = BridgeService::new(builder.build()?)?;

    let _foo = service.subscribe_to_foo(|event| {
        info!(event = %event.name, payload = ?event.payload, "Host listener received event");
    });

    let started = Instant::now();
    let result = service.get_num_transactions(0).await?;
    info!(%result, elapsed_ms = started.elapsed().as_millis() as u64, "getNumTransactions(0)");

    let legacy = service
        .call(LEGACY_MODULE_NAME, GET_NUM_TRANSACTIONS, vec![json!(-43)])
        .await?;
    info!(%legacy, "Legacy getNumTransactions(-43)");

    match service.get_num_transactions("not a number").await {
        Ok(value) => warn!(%value, "Unexpected resolution"),
        Err(err) => info!(code = err.code(), error = %err, "Rejected as expected"),
    }

    Ok(())
}
