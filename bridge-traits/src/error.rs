use thiserror::Error;

/// Rejection code reported to the host for every failure.
///
/// The host contract carries a single generic code plus a message; the
/// variants of [`BridgeError`] only exist on the Rust side.
pub const GENERIC_ERROR_CODE: &str = "Err";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Numeric overflow: {0}")]
    Overflow(String),

    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Unknown method {method} on module {module}")]
    UnknownMethod { module: String, method: String },

    #[error("Module already registered: {0}")]
    DuplicateModule(String),

    #[error("Promise dropped without settlement")]
    Dropped,

    #[error("Bridge operation failed: {0}")]
    Internal(String),
}

impl BridgeError {
    /// Code sent to the host alongside [`to_string`](ToString::to_string).
    pub fn code(&self) -> &'static str {
        GENERIC_ERROR_CODE
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
