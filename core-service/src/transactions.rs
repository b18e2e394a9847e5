//! The `RNZcash` native module.
//!
//! Exposes `getNumTransactions`, which replies with its argument plus
//! [`TRANSACTION_OFFSET`]. When the module is configured with a
//! [`NotificationConfig`], each call first broadcasts the configured event,
//! then blocks the calling thread for the configured delay, and only then
//! replies.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use bridge_traits::module::{expect_arity, number_arg};
use bridge_traits::{Arguments, BridgeError, EventEmitter, HostEvent, NativeModule, Promise};
use core_runtime::config::{ModuleConfig, NotificationConfig, NumericMode};
use serde_json::{Number, Value};
use tracing::{debug, info_span, warn};
use uuid::Uuid;

pub const GET_NUM_TRANSACTIONS: &str = "getNumTransactions";

/// Added to every `getNumTransactions` argument.
pub const TRANSACTION_OFFSET: i64 = 43;

const METHODS: &[&str] = &[GET_NUM_TRANSACTIONS];

// 2^63. Whole f64 values in [-2^63, 2^63) fit in i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Adds [`TRANSACTION_OFFSET`] to `value` according to `mode`.
///
/// Integer mode accepts whole numbers only (a float with no fractional part
/// counts, since JS hosts send every number as a double) and rejects on
/// overflow. Float mode uses plain `f64` addition.
pub fn compute_num_transactions(value: &Number, mode: NumericMode) -> Result<Value, BridgeError> {
    match mode {
        NumericMode::Integer => {
            let n = integer_value(value)?;
            n.checked_add(TRANSACTION_OFFSET)
                .map(Value::from)
                .ok_or_else(|| {
                    BridgeError::Overflow(format!("{} + {}", n, TRANSACTION_OFFSET))
                })
        }
        NumericMode::Float => {
            let n = value.as_f64().ok_or_else(|| {
                BridgeError::InvalidArgument(format!("{} is not representable as f64", value))
            })?;
            Number::from_f64(n + TRANSACTION_OFFSET as f64)
                .map(Value::Number)
                .ok_or_else(|| BridgeError::Overflow(format!("{} + {}", n, TRANSACTION_OFFSET)))
        }
    }
}

fn integer_value(value: &Number) -> Result<i64, BridgeError> {
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }

    if value.is_u64() {
        return Err(BridgeError::Overflow(format!("{} does not fit in i64", value)));
    }

    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f) => Ok(f as i64),
        Some(f) if f.fract() == 0.0 => {
            Err(BridgeError::Overflow(format!("{} does not fit in i64", value)))
        }
        _ => Err(BridgeError::InvalidArgument(format!(
            "{} is not an integer",
            value
        ))),
    }
}

/// Native module answering `getNumTransactions`.
pub struct ZcashModule {
    config: ModuleConfig,
    emitter: Arc<dyn EventEmitter>,
}

impl ZcashModule {
    pub fn new(config: ModuleConfig, emitter: Arc<dyn EventEmitter>) -> Self {
        Self { config, emitter }
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    /// Runs `getNumTransactions` on the current thread.
    ///
    /// Blocks for the notification delay when the module is configured to
    /// notify.
    pub fn get_num_transactions(&self, args: &[Value]) -> Result<Value, BridgeError> {
        expect_arity(args, 1)?;
        let value = number_arg(args, 0)?;

        if let Some(notification) = &self.config.notification {
            self.notify(notification);
        }

        compute_num_transactions(value, self.config.numeric_mode)
    }

    fn notify(&self, notification: &NotificationConfig) {
        let event = HostEvent::new(notification.event_name.as_str())
            .with_payload(notification.payload.clone());
        let listeners = self.emitter.emit(event);
        debug!(
            event = %notification.event_name,
            listeners,
            delay_ms = notification.delay.as_millis() as u64,
            "Notification sent, holding reply"
        );

        if !notification.delay.is_zero() {
            std::thread::sleep(notification.delay);
        }
    }
}

impl NativeModule for ZcashModule {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn method_names(&self) -> &[&'static str] {
        METHODS
    }

    fn invoke(&self, method: &str, args: Arguments, promise: Promise) {
        let call_id = Uuid::new_v4();
        let span = info_span!("bridge_call", module = %self.config.name, method, %call_id);
        let _entered = span.enter();

        let outcome = match method {
            GET_NUM_TRANSACTIONS => {
                panic::catch_unwind(AssertUnwindSafe(|| self.get_num_transactions(&args)))
                    .unwrap_or_else(|payload| Err(BridgeError::Internal(panic_message(payload))))
            }
            other => Err(BridgeError::UnknownMethod {
                module: self.config.name.clone(),
                method: other.to_string(),
            }),
        };

        match &outcome {
            Ok(value) => debug!(%value, "Resolving"),
            Err(err) => warn!(code = err.code(), error = %err, "Rejecting"),
        }

        if !promise.settle(outcome) {
            debug!("Caller stopped waiting before the reply was ready");
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "bridge method panicked".to_string()
    }
}
