use thiserror::Error;

/// All errors produced by chameleon-core.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{field} {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("device not connected")]
    NotConnected,

    #[error("command '{command}' timed out after {timeout_ms} ms")]
    Timeout { command: String, timeout_ms: u64 },

    #[error("device error: {0}")]
    Device(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BridgeError {
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_argument(field: impl Into<String>) -> Self {
        Self::invalid_argument(field, "cannot be null")
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
