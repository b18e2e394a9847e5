use bridge_traits::{BridgeError, GENERIC_ERROR_CODE};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl ServiceError {
    /// Code reported to the host; always the generic bridge code.
    pub fn code(&self) -> &'static str {
        GENERIC_ERROR_CODE
    }

    pub fn as_bridge(&self) -> Option<&BridgeError> {
        match self {
            ServiceError::Bridge(err) => Some(err),
            ServiceError::Runtime(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
