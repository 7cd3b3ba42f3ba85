//! Error types for the TerrAvion API client.
//!
//! # Design
//! Two failure tiers are kept observably apart: `Http` always carries the
//! real upstream status code, while `Transport` means no HTTP response was
//! produced at all and therefore has no status. `InvalidParameter` is raised
//! locally, before any request exists.

use serde_json::Value;
use thiserror::Error;

/// Boxed source error from the transport layer.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by TerrAvion client calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status outside `[200, 300)`.
    ///
    /// `message` reads `"<status> - <url> failed"`; `meta` is the response
    /// body, parsed as JSON when possible.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        meta: Value,
    },

    /// The request never produced an HTTP response (DNS, refused
    /// connection, TLS, timeout, unreadable body).
    #[error("transport failure: {0}")]
    Transport(#[source] TransportError),

    /// A filter value could not be expressed as a query parameter.
    #[error("invalid query parameter `{key}`: {reason}")]
    InvalidParameter { key: String, reason: String },
}

impl ApiError {
    pub fn transport(err: impl Into<TransportError>) -> Self {
        ApiError::Transport(err.into())
    }

    /// Upstream status code, only present for `Http` failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body attached to an `Http` failure.
    pub fn meta(&self) -> Option<&Value> {
        match self {
            ApiError::Http { meta, .. } => Some(meta),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}
