//! Bridge service façade.
//!
//! Wires the runtime pieces (configuration, event bus) to the native modules
//! the host application layer calls into. A host builds one
//! [`BridgeService`] from a [`BridgeConfig`], then dispatches method calls by
//! module and method name and registers listeners for emitted events.
//!
//! ```no_run
//! use core_runtime::config::BridgeConfig;
//! use core_service::BridgeService;
//!
//! # #[tokio::main]
//! # async fn main() -> core_service::Result<()> {
//! let service = BridgeService::new(BridgeConfig::builder().build()?)?;
//! let _foo = service.subscribe_to_foo(|event| println!("{:?}", event.payload));
//!
//! let result = service.get_num_transactions(0).await?;
//! assert_eq!(result.as_f64(), Some(43.0));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod registry;
pub mod transactions;

#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

pub use error::{Result, ServiceError};
pub use registry::ModuleRegistry;
pub use transactions::{ZcashModule, GET_NUM_TRANSACTIONS, TRANSACTION_OFFSET};

use std::sync::Arc;

use bridge_traits::{Arguments, EventEmitter, HostEvent, IntoArgument};
use core_runtime::config::{BridgeConfig, DEFAULT_NOTIFICATION_EVENT};
use core_runtime::events::{EventBus, EventStream, ListenerSubscription};
use serde_json::Value;
use tracing::info;

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct BridgeService {
    config: Arc<BridgeConfig>,
    event_bus: EventBus,
    registry: Arc<ModuleRegistry>,
}

impl BridgeService {
    /// Create a new service, registering every module the config enables.
    pub fn new(config: BridgeConfig) -> Result<Self> {
        config.validate()?;

        let event_bus = EventBus::new(config.event_buffer_size);
        let emitter: Arc<dyn EventEmitter> = Arc::new(event_bus.clone());

        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(ZcashModule::new(
            config.module.clone(),
            Arc::clone(&emitter),
        )))?;

        if let Some(legacy) = &config.legacy_module {
            registry.register(Arc::new(ZcashModule::new(
                legacy.clone(),
                Arc::clone(&emitter),
            )))?;
        }

        info!(
            modules = ?registry.module_names(),
            notifying = config.module.notification.is_some(),
            "Bridge service ready"
        );

        Ok(Self {
            config: Arc::new(config),
            event_bus,
            registry: Arc::new(registry),
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Calls `method` on `module` and waits for its reply.
    pub async fn call(&self, module: &str, method: &str, args: Arguments) -> Result<Value> {
        Ok(self.registry.call(module, method, args).await?)
    }

    /// `getNumTransactions` on the primary module.
    ///
    /// Non-finite floats are rejected before dispatch.
    pub async fn get_num_transactions(&self, value: impl IntoArgument) -> Result<Value> {
        let argument = value.into_argument()?;
        self.call(&self.config.module.name, GET_NUM_TRANSACTIONS, vec![argument])
            .await
    }

    /// Stream of every event emitted from now on.
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.event_bus.subscribe())
    }

    /// Registers `callback` for events named `event_name`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn add_listener<F>(&self, event_name: &str, callback: F) -> ListenerSubscription
    where
        F: Fn(HostEvent) + Send + Sync + 'static,
    {
        self.event_bus.add_listener(event_name, callback)
    }

    /// Registers `callback` for the primary module's notification event.
    pub fn subscribe_to_foo<F>(&self, callback: F) -> ListenerSubscription
    where
        F: Fn(HostEvent) + Send + Sync + 'static,
    {
        let event_name = self
            .config
            .module
            .notification
            .as_ref()
            .map(|notification| notification.event_name.as_str())
            .unwrap_or(DEFAULT_NOTIFICATION_EVENT);

        self.add_listener(event_name, callback)
    }
}

impl std::fmt::Debug for BridgeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeService")
            .field("config", &self.config)
            .field("event_bus", &self.event_bus)
            .field("registry", &self.registry)
            .finish()
    }
}
