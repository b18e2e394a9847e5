//! Workspace umbrella crate.
//!
//! Re-exports the bridge service so host applications can depend on a single
//! crate. Enable the `ffi` feature to build the UniFFI bindings.

pub use core_service::*;
