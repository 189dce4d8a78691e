//! Error types for the catalog client.
//!
//! # Design
//! The storefront only ever shows one "failed to fetch" notification, so
//! not-found is deliberately not a variant of its own: a 404 lands in
//! `Status` alongside every other non-success response. `kind()` collapses
//! the variants into the network/decode split that callers branch on.

use thiserror::Error;

/// Errors returned by `CatalogClient` parse methods and by transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not complete (offline, DNS, connection reset).
    #[error("request failed: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not decode into the expected shape.
    #[error("decode failed: {0}")]
    Decode(String),
}

/// Coarse failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Decode,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) | ApiError::Status { .. } => ErrorKind::Network,
            ApiError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
