//! Error types for the execution client.

use qusim_ir::IrError;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur when talking to the execution service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Circuit construction or transformation failed.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// The service rejected the token (HTTP 401).
    #[error("Authentication failed: the service rejected the token")]
    Authentication,

    /// The service answered with an error status or an unreadable body.
    #[error("Request failed ({status}): {message}")]
    Request { status: u16, message: String },

    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The token cannot be sent as a header value.
    #[error("Invalid token: not a valid Authorization header value")]
    InvalidToken,

    /// The adapter was used before a circuit was initialised.
    #[error("No circuit: call init_circuit first")]
    NotInitialized,

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// True for failures reported by the service rather than raised locally.
    pub fn is_remote(&self) -> bool {
        matches!(self, ClientError::Authentication | ClientError::Request { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_display() {
        let err = ClientError::Request {
            status: 500,
            message: "internal error".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("internal error"));
        assert!(err.is_remote());
    }

    #[test]
    fn test_ir_error_is_transparent() {
        let err: ClientError = IrError::MissingKey("gate requires a qubit key".into()).into();
        assert_eq!(err.to_string(), "Missing key: gate requires a qubit key");
        assert!(!err.is_remote());
    }

    #[test]
    fn test_authentication_display() {
        assert!(ClientError::Authentication.to_string().contains("token"));
    }
}
