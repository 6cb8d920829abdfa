//! Error type shared by every pipeline stage.

use thiserror::Error;

use crate::traits::LookupStatus;

pub type Result<T> = std::result::Result<T, RouteError>;

/// Errors that abort a route optimization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// Input, matrix or tour failed a precondition.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A credential or setting is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The geocoder could not resolve an address.
    #[error("could not resolve address {address:?} (status {status})")]
    Resolution {
        address: String,
        status: LookupStatus,
    },

    /// The routing service had no travel data for a waypoint pair.
    #[error(
        "no travel data from waypoint {origin_index} to waypoint {destination_index} \
         (status {status})"
    )]
    Matrix {
        origin_index: usize,
        destination_index: usize,
        status: LookupStatus,
    },

    /// The upstream service rejected the request as a whole.
    #[error("routing service returned {status}: {message}")]
    Service { status: String, message: String },

    /// Network or HTTP level failure.
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    #[error("optimization cancelled")]
    Cancelled,
}

impl RouteError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether repeating the same call may succeed.
    ///
    /// Status-level failures for a specific address or pair are terminal; only
    /// transport problems and upstream throttling are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout { .. } => true,
            Self::Service { status, .. } => {
                status == "OVER_QUERY_LIMIT" || status == "UNKNOWN_ERROR"
            }
            _ => false,
        }
    }
}
