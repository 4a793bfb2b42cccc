//! Unified error handling for anfctl-core
//!
//! Wraps ARM API failures, credential problems, and polling outcomes with
//! consistent classification helpers so callers can branch on error class
//! instead of string-matching messages.

use std::time::Duration;
use thiserror::Error;

/// Core error type for ARM operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// ARM returned a non-2xx response with an error envelope
    #[error("ARM API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The requested resource does not exist (404)
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Authentication or authorization failure (401/403, or token acquisition)
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Transport-level failure talking to the endpoint
    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Polling gave up before the resource reached a terminal state
    #[error("Timed out after {0:?} waiting for resource")]
    PollTimeout(Duration),

    /// The provider reported a terminal failure while provisioning
    #[error("Provisioning failed: {0}")]
    ProvisioningFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CoreError::AuthenticationFailed { .. })
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, CoreError::Api { status, .. } if *status >= 500)
    }

    /// Returns true if this is a timeout error
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            CoreError::PollTimeout(_) => true,
            CoreError::Connection(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns true if this error is potentially retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::Api { status, .. } => *status == 429 || *status >= 500,
            CoreError::PollTimeout(_) => true,
            CoreError::Connection(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
