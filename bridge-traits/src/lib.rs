//! # Host Bridge Traits
//!
//! The contract between the Rust core and the host application layer that
//! invokes it (React Native's `NativeModules` on iOS/Android).
//!
//! ## Overview
//!
//! The host calls a method on a named module, passing dynamic arguments and
//! an asynchronous reply handle. The module settles the reply once and may
//! broadcast fire-and-forget events to listeners registered on the host side.
//!
//! ## Types
//!
//! - [`NativeModule`](module::NativeModule) - Named module with invocable methods
//! - [`Promise`](promise::Promise) / [`PendingReply`](promise::PendingReply) - Reply channel
//! - [`EventEmitter`](event::EventEmitter) / [`HostEvent`](event::HostEvent) - Notification surface
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! Every failure crossing the bridge is a [`BridgeError`](error::BridgeError).
//! The host only ever sees the generic code `"Err"` plus the error message;
//! the variants exist so Rust callers can match on them.
//!
//! ## Thread Safety
//!
//! Modules, emitters and sinks require `Send + Sync`. A module's `invoke` may
//! block the calling thread, so async callers should dispatch it onto a
//! blocking worker.

pub mod error;
pub mod event;
pub mod logging;
pub mod module;
pub mod promise;

pub use error::{BridgeError, GENERIC_ERROR_CODE};

pub use event::{EventEmitter, EventPayload, HostEvent};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use module::{Arguments, IntoArgument, NativeModule};
pub use promise::{PendingReply, Promise};
