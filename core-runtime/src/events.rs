//! # Event Bus System
//!
//! Delivers host notification events using `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **EventBus**: Central broadcast channel; implements [`EventEmitter`] so
//!   native modules can emit from a blocking thread
//! - **EventStream**: Wrapper for consuming events with an optional filter
//! - **ListenerSubscription**: Callback-style listener for a single event
//!   name, the Rust counterpart of `NativeEventEmitter.addListener`
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    emit     ┌───────────┐    subscribe    ┌──────────────┐
//! │ RNZcash      ├────────────>│ EventBus  ├────────────────>│ EventStream  │
//! │ module       │             │ (broadcast│                 └──────────────┘
//! └──────────────┘             │  channel) │   add_listener  ┌──────────────┐
//!                              │           ├────────────────>│ Listener     │
//!                              └───────────┘                 │ callback     │
//!                                                            └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use bridge_traits::{EventEmitter, HostEvent};
//! use core_runtime::events::EventBus;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut stream = event_bus.subscribe();
//!
//! event_bus.emit(HostEvent::new("FooEvent").with_entry("foo", "bar3"));
//!
//! let event = stream.recv().await.unwrap();
//! assert_eq!(event.name, "FooEvent");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Receivers can observe two errors:
//!
//! - **`RecvError::Lagged(n)`**: the listener was too slow and missed `n`
//!   events. Non-fatal; listeners log a warning and keep going.
//! - **`RecvError::Closed`**: every sender was dropped. Treated as shutdown.
//!
//! Emitting with no listeners is not an error: host events are
//! fire-and-forget.

use std::fmt;

use bridge_traits::{EventEmitter, HostEvent};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub use tokio::sync::broadcast::error::RecvError;
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Listeners that fall further behind than this receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to host events.
///
/// Cloning is cheap; all clones share the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<HostEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. [`BridgeConfig`](crate::config::BridgeConfig)
    /// validation rejects that value before it gets here.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<HostEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    ///
    /// ```rust
    /// use core_runtime::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.subscriber_count(), 0);
    ///
    /// let _subscriber = event_bus.subscribe();
    /// assert_eq!(event_bus.subscriber_count(), 1);
    /// ```
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Registers `callback` for every event named `event_name`.
    ///
    /// The callback runs on a Tokio task, so this must be called from within
    /// a Tokio runtime. Delivery stops once the returned subscription is
    /// removed or dropped.
    pub fn add_listener<F>(&self, event_name: impl Into<String>, callback: F) -> ListenerSubscription
    where
        F: Fn(HostEvent) + Send + Sync + 'static,
    {
        let event_name = event_name.into();
        let mut stream = EventStream::new(self.subscribe()).for_event(event_name.clone());
        let listener_name = event_name.clone();

        let handle = tokio::spawn(async move {
            loop {
                match stream.recv().await {
                    Ok(event) => callback(event),
                    Err(RecvError::Lagged(missed)) => {
                        warn!(event = %listener_name, missed, "Listener lagged, events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        ListenerSubscription {
            event_name,
            handle: Some(handle),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl EventEmitter for EventBus {
    fn emit(&self, event: HostEvent) -> usize {
        let name = event.name.clone();
        match self.sender.send(event) {
            Ok(listeners) => {
                debug!(event = %name, listeners, "Event emitted");
                listeners
            }
            Err(_) => {
                debug!(event = %name, "Event emitted with no listeners");
                0
            }
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&HostEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
pub struct EventStream {
    receiver: Receiver<HostEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<HostEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&HostEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Only events named `name` are returned by `recv()`.
    pub fn for_event(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.filter(move |event| event.is_named(&name))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<HostEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.matches(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive a matching event without waiting.
    ///
    /// Returns `None` if no matching events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<HostEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.matches(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    fn matches(&self, event: &HostEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Listener Subscription
// ============================================================================

/// Handle for a listener registered with [`EventBus::add_listener`].
///
/// Dropping the handle stops delivery; [`remove`](Self::remove) also waits
/// until the listener task has finished.
#[derive(Debug)]
pub struct ListenerSubscription {
    event_name: String,
    handle: Option<JoinHandle<()>>,
}

impl ListenerSubscription {
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops delivery and waits for the listener task to wind down.
    pub async fn remove(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
        debug!(event = %self.event_name, "Listener removed");
    }
}

impl Drop for ListenerSubscription {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
