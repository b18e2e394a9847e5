//! # Bridge Configuration Module
//!
//! Provides configuration management for the Zcash bridge core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! [`BridgeConfig`] describing which native modules are exposed, how they
//! interpret their numeric argument, and whether the primary module sends a
//! notification event (with its blocking delay) before replying. Validation
//! is fail-fast: `build()` rejects inconsistent settings with an actionable
//! message.
//!
//! ## Usage
//!
//! ### Default configuration
//!
//! ```
//! use core_runtime::config::BridgeConfig;
//!
//! let config = BridgeConfig::builder().build().expect("valid config");
//! assert_eq!(config.module.name, "RNZcash");
//! assert!(config.module.notification.is_none());
//! ```
//!
//! ### Notifying variant with a short delay
//!
//! ```
//! use core_runtime::config::{BridgeConfig, NotificationConfig};
//! use std::time::Duration;
//!
//! let config = BridgeConfig::builder()
//!     .notification(NotificationConfig::default().with_delay(Duration::from_millis(50)))
//!     .build()
//!     .expect("valid config");
//!
//! let notification = config.module.notification.unwrap();
//! assert_eq!(notification.event_name, "FooEvent");
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::BridgeConfig;
//!
//! // Panics: the event buffer must hold at least one event
//! BridgeConfig::builder()
//!     .event_buffer_size(0)
//!     .build()
//!     .expect("Should fail - empty event buffer");
//! ```

use std::time::Duration;

use bridge_traits::EventPayload;

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;

/// Name of the primary native module.
pub const DEFAULT_MODULE_NAME: &str = "RNZcash";

/// Name of the older integer-only module kept for hosts still importing it.
pub const LEGACY_MODULE_NAME: &str = "RNReactNativeZcash";

/// Event broadcast by the notifying variant.
pub const DEFAULT_NOTIFICATION_EVENT: &str = "FooEvent";

/// How long the notifying variant blocks its calling thread after emitting.
///
/// The reply is held for the whole delay, so a host awaiting the call
/// resolves no earlier than this.
pub const DEFAULT_NOTIFICATION_DELAY: Duration = Duration::from_secs(20);

/// Upper bound accepted for the notification delay.
pub const MAX_NOTIFICATION_DELAY: Duration = Duration::from_secs(600);

const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// How a module interprets its numeric argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericMode {
    /// Whole numbers only; arithmetic is checked.
    Integer,
    /// Any number, using `f64` addition.
    #[default]
    Float,
}

/// Event emitted (followed by a blocking delay) before a module replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    pub event_name: String,
    pub payload: EventPayload,
    pub delay: Duration,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        let mut payload = EventPayload::new();
        payload.insert("foo".to_string(), "bar3".to_string());

        Self {
            event_name: DEFAULT_NOTIFICATION_EVENT.to_string(),
            payload,
            delay: DEFAULT_NOTIFICATION_DELAY,
        }
    }
}

impl NotificationConfig {
    pub fn with_event_name(mut self, name: impl Into<String>) -> Self {
        self.event_name = name.into();
        self
    }

    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.event_name.trim().is_empty() {
            return Err(Error::Config(
                "Notification event name cannot be empty".to_string(),
            ));
        }

        if self.delay > MAX_NOTIFICATION_DELAY {
            return Err(Error::Config(format!(
                "Notification delay of {:?} exceeds maximum of {:?}",
                self.delay, MAX_NOTIFICATION_DELAY
            )));
        }

        Ok(())
    }
}

/// Settings for a single native module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConfig {
    pub name: String,
    pub numeric_mode: NumericMode,
    /// When set, the module emits this event and then blocks before replying.
    pub notification: Option<NotificationConfig>,
}

impl ModuleConfig {
    pub fn new(name: impl Into<String>, numeric_mode: NumericMode) -> Self {
        Self {
            name: name.into(),
            numeric_mode,
            notification: None,
        }
    }

    pub fn with_notification(mut self, notification: NotificationConfig) -> Self {
        self.notification = Some(notification);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("Module name cannot be empty".to_string()));
        }

        if let Some(notification) = &self.notification {
            notification.validate()?;
        }

        Ok(())
    }
}

/// Configuration for the bridge core.
///
/// Use [`BridgeConfigBuilder`] to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// The primary module (`RNZcash` by default).
    pub module: ModuleConfig,
    /// The integer-only legacy module, if exposed.
    pub legacy_module: Option<ModuleConfig>,
    /// Events buffered per listener before it starts lagging.
    pub event_buffer_size: usize,
}

impl BridgeConfig {
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Module names are non-empty and distinct
    /// - Notification event name is non-empty and the delay is bounded
    /// - The event buffer size is in range
    pub fn validate(&self) -> Result<()> {
        self.module.validate()?;

        if let Some(legacy) = &self.legacy_module {
            legacy.validate()?;

            if legacy.name == self.module.name {
                return Err(Error::Config(format!(
                    "Legacy module name '{}' collides with the primary module. \
                     Pick a distinct name or disable the legacy module.",
                    legacy.name
                )));
            }
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        Ok(())
    }
}

/// Builder for constructing [`BridgeConfig`] instances.
#[derive(Debug, Default)]
pub struct BridgeConfigBuilder {
    module_name: Option<String>,
    numeric_mode: Option<NumericMode>,
    notification: Option<NotificationConfig>,
    enable_legacy_module: Option<bool>,
    legacy_module_name: Option<String>,
    event_buffer_size: Option<usize>,
}

impl BridgeConfigBuilder {
    /// Sets the primary module name.
    ///
    /// Default: `"RNZcash"`
    pub fn module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = Some(name.into());
        self
    }

    /// Sets how the primary module reads its argument.
    ///
    /// Default: [`NumericMode::Float`]
    pub fn numeric_mode(mut self, mode: NumericMode) -> Self {
        self.numeric_mode = Some(mode);
        self
    }

    /// Enables the notifying variant on the primary module.
    pub fn notification(mut self, notification: NotificationConfig) -> Self {
        self.notification = Some(notification);
        self
    }

    /// Overrides only the delay of the notifying variant, enabling it with
    /// default event settings if it was not configured yet.
    pub fn notification_delay(mut self, delay: Duration) -> Self {
        let notification = self.notification.take().unwrap_or_default();
        self.notification = Some(notification.with_delay(delay));
        self
    }

    pub fn without_notification(mut self) -> Self {
        self.notification = None;
        self
    }

    /// Exposes the integer-only legacy module alongside the primary one.
    ///
    /// Default: true
    pub fn enable_legacy_module(mut self, enabled: bool) -> Self {
        self.enable_legacy_module = Some(enabled);
        self
    }

    /// Default: `"RNReactNativeZcash"`
    pub fn legacy_module_name(mut self, name: impl Into<String>) -> Self {
        self.legacy_module_name = Some(name.into());
        self
    }

    /// Default: 100
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<BridgeConfig> {
        let mut module = ModuleConfig::new(
            self.module_name
                .unwrap_or_else(|| DEFAULT_MODULE_NAME.to_string()),
            self.numeric_mode.unwrap_or_default(),
        );
        module.notification = self.notification;

        let legacy_module = if self.enable_legacy_module.unwrap_or(true) {
            Some(ModuleConfig::new(
                self.legacy_module_name
                    .unwrap_or_else(|| LEGACY_MODULE_NAME.to_string()),
                NumericMode::Integer,
            ))
        } else {
            None
        };

        let config = BridgeConfig {
            module,
            legacy_module,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::builder().build().unwrap();

        assert_eq!(config.module.name, DEFAULT_MODULE_NAME);
        assert_eq!(config.module.numeric_mode, NumericMode::Float);
        assert!(config.module.notification.is_none());
        assert_eq!(
            config.legacy_module,
            Some(ModuleConfig::new(LEGACY_MODULE_NAME, NumericMode::Integer))
        );
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
    }

    #[test]
    fn test_default_notification() {
        let notification = NotificationConfig::default();

        assert_eq!(notification.event_name, "FooEvent");
        assert_eq!(notification.payload.get("foo"), Some(&"bar3".to_string()));
        assert_eq!(notification.delay, Duration::from_secs(20));
    }

    #[test]
    fn test_notification_delay_enables_notification() {
        let config = BridgeConfig::builder()
            .notification_delay(Duration::from_millis(10))
            .build()
            .unwrap();

        let notification = config.module.notification.unwrap();
        assert_eq!(notification.delay, Duration::from_millis(10));
        assert_eq!(notification.event_name, DEFAULT_NOTIFICATION_EVENT);
    }

    #[test]
    fn test_without_notification() {
        let config = BridgeConfig::builder()
            .notification(NotificationConfig::default())
            .without_notification()
            .build()
            .unwrap();

        assert!(config.module.notification.is_none());
    }

    #[test]
    fn test_legacy_module_disabled() {
        let config = BridgeConfig::builder()
            .enable_legacy_module(false)
            .build()
            .unwrap();

        assert!(config.legacy_module.is_none());
    }

    #[test]
    fn test_rejects_empty_module_name() {
        let result = BridgeConfig::builder().module_name("  ").build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("Module name")));
    }

    #[test]
    fn test_rejects_colliding_module_names() {
        let result = BridgeConfig::builder()
            .legacy_module_name(DEFAULT_MODULE_NAME)
            .build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("collides")));
    }

    #[test]
    fn test_rejects_excessive_delay() {
        let result = BridgeConfig::builder()
            .notification_delay(MAX_NOTIFICATION_DELAY + Duration::from_secs(1))
            .build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("exceeds maximum")));
    }

    #[test]
    fn test_rejects_empty_event_name() {
        let result = BridgeConfig::builder()
            .notification(NotificationConfig::default().with_event_name(""))
            .build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("event name")));
    }

    #[test]
    fn test_event_buffer_bounds() {
        assert!(BridgeConfig::builder().event_buffer_size(0).build().is_err());
        assert!(BridgeConfig::builder()
            .event_buffer_size(MAX_EVENT_BUFFER_SIZE + 1)
            .build()
            .is_err());
        assert!(BridgeConfig::builder().event_buffer_size(1).build().is_ok());
    }
}
