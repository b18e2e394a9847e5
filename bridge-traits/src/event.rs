//! Host notification events.
//!
//! Native modules broadcast named events to listeners registered in the host
//! application layer (`NativeEventEmitter.addListener` on the JS side).
//! Delivery is fire-and-forget: there is no acknowledgement and no replay.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// String-keyed payload attached to a host event.
pub type EventPayload = BTreeMap<String, String>;

/// A named notification with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEvent {
    /// Event name the host subscribes to (e.g. `"FooEvent"`).
    pub name: String,
    /// Payload delivered to every listener.
    pub payload: EventPayload,
}

impl HostEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: EventPayload::new(),
        }
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
    }
}

/// Broadcasts events to the host.
///
/// Emission is synchronous so it can be called from a blocking bridge
/// method. Implementations must not fail when nobody is listening.
pub trait EventEmitter: Send + Sync {
    /// Emits `event` and returns how many listeners it reached.
    fn emit(&self, event: HostEvent) -> usize;
}
