use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::Capability;

/// Structured validation/build error returned by the SDK.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "{}: {}", field, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<String> for ValidationError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ValidationError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// A resource was requested that this client configuration does not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{capability} are not supported by this client")]
pub struct CapabilityError {
    pub capability: Capability,
}

/// Structured error envelope returned by the API (`{"error": {...}}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    /// Remote error type, e.g. `invalid_request_error`.
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub param: Option<String>,
    pub message: String,
    /// Raw response body for debugging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_body: Option<String>,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            error_type: None,
            code: None,
            param: None,
            message: message.into(),
            raw_body: None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = &self.code {
            write!(f, "{} ({}): {}", code, self.status, self.message)
        } else {
            write!(f, "{}: {}", self.status, self.message)
        }
    }
}

impl std::error::Error for ApiError {}

/// Non-success HTTP status whose body is not a structured API error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected response ({status}): {body}")]
pub struct TransportError {
    pub status: u16,
    pub body: String,
}

/// Network-level failure before any HTTP response was received
/// (timeouts, DNS/TLS/connectivity).
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    pub message: String,
    #[source]
    pub source: Option<reqwest::Error>,
}

/// Broad connection error kinds for classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    Timeout,
    Connect,
    Request,
    Other,
}

impl fmt::Display for ConnectionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionErrorKind::Timeout => "timeout",
            ConnectionErrorKind::Connect => "connect",
            ConnectionErrorKind::Request => "request",
            ConnectionErrorKind::Other => "connection",
        };
        write!(f, "{label}")
    }
}

impl From<reqwest::Error> for ConnectionError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ConnectionErrorKind::Timeout
        } else if err.is_connect() {
            ConnectionErrorKind::Connect
        } else if err.is_request() {
            ConnectionErrorKind::Request
        } else {
            ConnectionErrorKind::Other
        };

        ConnectionError {
            kind,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// A successful response whose body does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {response} response: {message}")]
pub struct MalformedResponseError {
    /// Which response type was being decoded.
    pub response: &'static str,
    pub message: String,
}

impl MalformedResponseError {
    pub fn new(response: &'static str, message: impl Into<String>) -> Self {
        Self {
            response,
            message: message.into(),
        }
    }
}

/// Convenience alias for fallible SDK results.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type surfaced by the SDK.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Capability(#[from] CapabilityError),

    #[error("{0}")]
    Connection(#[from] ConnectionError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("{0}")]
    MalformedResponse(#[from] MalformedResponseError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// HTTP status of the failed exchange, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.status),
            Error::Transport(err) => Some(err.status),
            _ => None,
        }
    }
}
