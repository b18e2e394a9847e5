//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the Zcash bridge core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus and host listener subscriptions
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the bridge modules depend on.
//! It establishes the logging conventions and the event broadcasting
//! mechanism used to deliver notifications to the host application layer.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
