//! UniFFI bindings for mobile hosts.
//!
//! Exposes the bridge to Kotlin/Swift as an `FfiBridge` object. Numeric
//! arguments cross the boundary as `f64`, matching how JS hands numbers to
//! native code. Every failure surfaces as [`FfiBridgeError::Rejected`] with
//! the generic code.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use core_runtime::config::BridgeConfig;
use core_runtime::events::ListenerSubscription;

use crate::{BridgeService, ServiceError};

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiBridgeError {
    #[error("{code}: {message}")]
    Rejected { code: String, message: String },
}

impl From<ServiceError> for FfiBridgeError {
    fn from(err: ServiceError) -> Self {
        FfiBridgeError::Rejected {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Receives events emitted by the bridge on the foreign side.
#[uniffi::export(callback_interface)]
pub trait FfiEventListener: Send + Sync {
    fn on_event(&self, name: String, payload: HashMap<String, String>);
}

#[derive(uniffi::Object)]
pub struct FfiBridge {
    service: BridgeService,
    listeners: Mutex<Vec<ListenerSubscription>>,
}

#[uniffi::export(async_runtime = "tokio")]
impl FfiBridge {
    /// Builds a bridge; a delay enables the notifying variant.
    #[uniffi::constructor]
    pub fn new(notification_delay_ms: Option<u64>) -> Result<Arc<Self>, FfiBridgeError> {
        let mut builder = BridgeConfig::builder();
        if let Some(delay_ms) = notification_delay_ms {
            builder = builder.notification_delay(Duration::from_millis(delay_ms));
        }
        let config = builder.build().map_err(ServiceError::from)?;

        Ok(Arc::new(Self {
            service: BridgeService::new(config)?,
            listeners: Mutex::new(Vec::new()),
        }))
    }

    pub async fn get_num_transactions(&self, value: f64) -> Result<f64, FfiBridgeError> {
        let result = self.service.get_num_transactions(value).await?;
        result.as_f64().ok_or_else(|| FfiBridgeError::Rejected {
            code: bridge_traits::GENERIC_ERROR_CODE.to_string(),
            message: format!("non-numeric reply: {}", result),
        })
    }

    pub async fn add_listener(&self, event_name: String, listener: Box<dyn FfiEventListener>) {
        let listener: Arc<dyn FfiEventListener> = Arc::from(listener);
        let subscription = self.service.add_listener(&event_name, move |event| {
            listener.on_event(event.name, event.payload.into_iter().collect());
        });

        // Push and clear leave the list consistent, so a poisoned lock is still usable.
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(subscription);
    }

    /// Drops every listener registered through this bridge.
    pub fn remove_all_listeners(&self) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
