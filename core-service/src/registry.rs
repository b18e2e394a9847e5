//! Name-based lookup and dispatch of native modules.
//!
//! The registry plays the part of the host's `NativeModules` table: callers
//! address a module and method by name and get an asynchronous reply.
//! Invocations may block, so [`ModuleRegistry::call`] runs each one on
//! Tokio's blocking pool; concurrent calls never wait on each other.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bridge_traits::{Arguments, BridgeError, NativeModule, PendingReply, Promise};
use serde_json::Value;
use tracing::{debug, error};

#[derive(Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<dyn NativeModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `module` under its own name.
    pub fn register(&mut self, module: Arc<dyn NativeModule>) -> Result<(), BridgeError> {
        let name = module.name().to_string();
        if self.modules.contains_key(&name) {
            return Err(BridgeError::DuplicateModule(name));
        }

        debug!(module = %name, methods = ?module.method_names(), "Registered native module");
        self.modules.insert(name, module);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn NativeModule>> {
        self.modules.get(name).cloned()
    }

    /// Registered module names, sorted.
    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.keys().cloned().collect();
        names.sort();
        names
    }

    fn resolve(&self, module: &str, method: &str) -> Result<Arc<dyn NativeModule>, BridgeError> {
        let target = self
            .get(module)
            .ok_or_else(|| BridgeError::UnknownModule(module.to_string()))?;

        if !target.has_method(method) {
            return Err(BridgeError::UnknownMethod {
                module: module.to_string(),
                method: method.to_string(),
            });
        }

        Ok(target)
    }

    /// Invokes a method on the current thread and returns its pending reply.
    ///
    /// Lookup failures are delivered through the reply like any other
    /// rejection.
    pub fn invoke_blocking(&self, module: &str, method: &str, args: Arguments) -> PendingReply {
        let (promise, reply) = Promise::channel();
        match self.resolve(module, method) {
            Ok(target) => target.invoke(method, args, promise),
            Err(err) => {
                promise.reject(err);
            }
        }
        reply
    }

    /// Invokes a method on the blocking pool and waits for its reply.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn call(&self, module: &str, method: &str, args: Arguments) -> Result<Value, BridgeError> {
        let target = self.resolve(module, method)?;
        let (promise, reply) = Promise::channel();
        let method_name = method.to_string();

        let invocation =
            tokio::task::spawn_blocking(move || target.invoke(&method_name, args, promise));

        let result = reply.await;
        if let Err(join_err) = invocation.await {
            error!(module, method, error = %join_err, "Bridge invocation did not complete");
            if result.is_err() {
                return Err(BridgeError::Internal(join_err.to_string()));
            }
        }
        result
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.module_names())
            .finish()
    }
}
