//! Error types for the retail core.
//!
//! # Design
//! `ApiError` describes what went wrong talking to the product API and is
//! produced by `ProductApi` parse methods. `RetailError` is the taxonomy the
//! domain components surface to the presentation layer; remote failures are
//! wrapped rather than flattened so callers can still inspect the status.

use thiserror::Error;

use crate::http::TransportError;

/// Errors returned by `ProductApi` build and parse methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 404: the requested product does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// No response was received at all.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors surfaced by the domain components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetailError {
    /// A required field is missing or malformed. Raised before any side effect.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced id does not exist in the target collection.
    #[error("not found: {0}")]
    NotFound(String),

    /// The entity is already present where uniqueness is required.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// The product API call failed (non-success status or no response).
    #[error("remote call failed: {0}")]
    Remote(#[from] ApiError),

    /// Configuration could not be resolved.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RetailError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type used across the domain components.
pub type RetailResult<T> = Result<T, RetailError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_keeps_status_in_message() {
        let err = RetailError::from(ApiError::HttpError {
            status: 500,
            body: "boom".to_string(),
        });
        assert_eq!(err.to_string(), "remote call failed: HTTP 500: boom");
    }

    #[test]
    fn transport_error_converts_into_api_error() {
        let err: ApiError = TransportError("connection refused".to_string()).into();
        assert_eq!(err.to_string(), "transport failed: connection refused");
    }
}
