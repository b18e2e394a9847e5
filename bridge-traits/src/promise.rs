//! Asynchronous reply handle for bridge methods.
//!
//! A bridge method receives a [`Promise`] and settles it exactly once. The
//! caller keeps the matching [`PendingReply`], which is a future resolving to
//! the settled value. Settling consumes the promise, so double resolution is
//! impossible by construction.
//!
//! ```
//! use bridge_traits::promise::Promise;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (promise, reply) = Promise::channel();
//! promise.resolve(43.0);
//! assert_eq!(reply.await.unwrap(), serde_json::json!(43.0));
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::{BridgeError, Result};

/// Sending half of a bridge reply.
#[derive(Debug)]
pub struct Promise {
    sender: oneshot::Sender<Result<Value>>,
}

/// Receiving half of a bridge reply.
///
/// Resolves to [`BridgeError::Dropped`] if the promise is dropped without
/// being settled.
#[derive(Debug)]
pub struct PendingReply {
    receiver: oneshot::Receiver<Result<Value>>,
}

impl Promise {
    /// Creates a connected promise/reply pair.
    pub fn channel() -> (Promise, PendingReply) {
        let (sender, receiver) = oneshot::channel();
        (Promise { sender }, PendingReply { receiver })
    }

    /// Resolves the promise with a value.
    ///
    /// Returns `false` if the caller stopped waiting for the reply.
    pub fn resolve(self, value: impl Into<Value>) -> bool {
        self.settle(Ok(value.into()))
    }

    /// Rejects the promise.
    ///
    /// Returns `false` if the caller stopped waiting for the reply.
    pub fn reject(self, error: BridgeError) -> bool {
        self.settle(Err(error))
    }

    /// Resolves on `Ok`, rejects on `Err`.
    pub fn settle(self, result: Result<Value>) -> bool {
        self.sender.send(result).is_ok()
    }

    /// Whether the caller is still waiting for this reply.
    pub fn is_awaited(&self) -> bool {
        !self.sender.is_closed()
    }
}

impl PendingReply {
    /// Blocks the current thread until the promise settles.
    ///
    /// Must not be called from within an async runtime.
    pub fn blocking_wait(self) -> Result<Value> {
        self.receiver
            .blocking_recv()
            .unwrap_or(Err(BridgeError::Dropped))
    }

    /// Returns the settled result if available, without waiting.
    pub fn try_take(&mut self) -> Option<Result<Value>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(BridgeError::Dropped)),
        }
    }
}

impl Future for PendingReply {
    type Output = Result<Value>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(BridgeError::Dropped)))
    }
}
