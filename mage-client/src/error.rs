//! Error types for the Mage client

use std::fmt;

use thiserror::Error;

use crate::Method;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// What the service (or the transport) said about a failed request
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    /// The error body returned by the service, as received and parsed as JSON
    Body {
        raw: String,
        parsed: serde_json::Value,
    },
    /// Fallback diagnostic when no JSON body is available
    Message(String),
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDetail::Body { raw, .. } => write!(f, "{}", raw),
            ErrorDetail::Message(message) => write!(f, "{}", message),
        }
    }
}

impl ErrorDetail {
    /// Classify a failed response body
    ///
    /// JSON bodies keep their exact text next to the parsed value; anything
    /// else is kept as a message, or replaced by `fallback` when empty.
    pub fn from_body(body: String, fallback: impl FnOnce() -> String) -> Self {
        match serde_json::from_str(&body) {
            Ok(parsed) => ErrorDetail::Body { raw: body, parsed },
            Err(_) if body.trim().is_empty() => ErrorDetail::Message(fallback()),
            Err(_) => ErrorDetail::Message(body),
        }
    }
}

/// Errors that can occur when using the Mage client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Method outside GET/POST/PUT/DELETE; raised before any network I/O
    #[error("Unsupported HTTP method: {method}")]
    UnsupportedMethod { method: String },

    /// Transport failure or non-2xx response
    #[error("Error communicating with Mage API ({method} {endpoint}): {detail}")]
    RemoteRequest {
        endpoint: String,
        method: Method,
        /// HTTP status, absent when no response was received
        status: Option<u16>,
        detail: ErrorDetail,
    },

    /// A successful response whose body did not have the expected shape
    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// The client could not be constructed from the given settings
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Create a remote request error
    pub fn remote(
        endpoint: impl Into<String>,
        method: Method,
        status: Option<u16>,
        detail: ErrorDetail,
    ) -> Self {
        Self::RemoteRequest {
            endpoint: endpoint.into(),
            method,
            status,
            detail,
        }
    }

    /// HTTP status of the failed request, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRequest { status, .. } => *status,
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The upstream payload exactly as the service reported it
    ///
    /// For remote failures this is the error body (or the fallback
    /// diagnostic); other errors render their own message.
    pub fn upstream_payload(&self) -> String {
        match self {
            Self::RemoteRequest { detail, .. } => detail.to_string(),
            other => other.to_string(),
        }
    }
}
