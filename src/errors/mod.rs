//! Error types for the SambaNova adapter.
//!
//! Covers request validation done before any I/O, every failure the vendor
//! call can surface, and the per-tool-call argument failure the adapter
//! recovers from locally.

use std::time::Duration;
use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Error type for adapter and vendor client operations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Configuration error (missing API key, bad base URL, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// The generic request was rejected before any vendor call was made.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
        /// The offending field, when known.
        param: Option<String>,
    },

    /// Authentication error (invalid or missing API key).
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Error message from the API.
        message: String,
        /// Hint about the API key (last 4 chars).
        api_key_hint: Option<String>,
    },

    /// Authorization error (insufficient permissions).
    #[error("Authorization failed: {message}")]
    Authorization {
        /// Error message describing the authorization issue.
        message: String,
    },

    /// The vendor rejected the payload.
    #[error("Validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
        /// The parameter that caused the error.
        param: Option<String>,
    },

    /// Model not found or unavailable.
    #[error("Model error: {message}")]
    Model {
        /// Error message.
        message: String,
        /// The model ID that caused the error.
        model: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        /// Error message.
        message: String,
        /// Duration to wait before retrying.
        retry_after: Option<Duration>,
    },

    /// Server error (5xx status codes).
    #[error("Server error (HTTP {status_code}): {message}")]
    Server {
        /// Error message.
        message: String,
        /// HTTP status code.
        status_code: u16,
        /// Request ID for debugging.
        request_id: Option<String>,
    },

    /// Any other non-2xx response.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Raw response body, redacted and truncated.
        body: Option<String>,
    },

    /// Network/connection error.
    #[error("Network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Request timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Transport failure that is neither a connect error nor a timeout.
    #[error("Transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// A single tool call carried arguments that are not a JSON object.
    #[error("Malformed arguments for tool call '{name}': {message}")]
    MalformedToolArguments {
        /// Function name of the offending tool call.
        name: String,
        /// Parse failure.
        message: String,
        /// The raw argument string as received.
        arguments: String,
    },

    /// The blocking worker running the vendor call panicked or was cancelled.
    #[error("Worker error: {message}")]
    Worker {
        /// Error message.
        message: String,
    },
}

impl AdapterError {
    /// Returns true if the error came from the vendor call or its transport.
    pub fn is_vendor_failure(&self) -> bool {
        matches!(
            self,
            AdapterError::Authentication { .. }
                | AdapterError::Authorization { .. }
                | AdapterError::Validation { .. }
                | AdapterError::Model { .. }
                | AdapterError::RateLimit { .. }
                | AdapterError::Server { .. }
                | AdapterError::Api { .. }
                | AdapterError::Network { .. }
                | AdapterError::Timeout { .. }
                | AdapterError::Transport { .. }
                | AdapterError::Serialization { .. }
        )
    }

    /// Returns true if a caller-side retry could succeed.
    ///
    /// The adapter itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AdapterError::RateLimit { .. }
                | AdapterError::Server { status_code: 500..=504, .. }
                | AdapterError::Timeout { .. }
                | AdapterError::Network { .. }
        )
    }

    /// Returns the retry-after duration if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AdapterError::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        AdapterError::InvalidRequest {
            message: message.into(),
            param: None,
        }
    }

    /// Creates an invalid request error naming the offending field.
    pub fn invalid_param(message: impl Into<String>, param: impl Into<String>) -> Self {
        AdapterError::InvalidRequest {
            message: message.into(),
            param: Some(param.into()),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        AdapterError::Configuration {
            message: message.into(),
        }
    }

    /// Creates a server error.
    pub fn server(status_code: u16, message: impl Into<String>) -> Self {
        AdapterError::Server {
            message: message.into(),
            status_code,
            request_id: None,
        }
    }
}

/// API error response body returned by SambaNova.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// The error details.
    pub error: ApiErrorDetail,
}

/// Detailed API error information.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorDetail {
    /// The error type.
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    /// The error message.
    pub message: String,
    /// The parameter that caused the error.
    pub param: Option<String>,
    /// The error code.
    pub code: Option<String>,
}

impl From<TransportError> for AdapterError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connection { message } => AdapterError::Network { message },
            TransportError::Timeout { timeout } => AdapterError::Timeout {
                message: format!("no response after {:?}", timeout),
            },
            other => AdapterError::Transport {
                message: other.to_string(),
            },
        }
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout {
                message: err.to_string(),
            }
        } else if err.is_connect() {
            AdapterError::Network {
                message: err.to_string(),
            }
        } else {
            AdapterError::Transport {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for AdapterError {
    fn from(err: url::ParseError) -> Self {
        AdapterError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
