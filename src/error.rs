//! Heimdall error types

use std::time::Duration;

/// Heimdall error types.
///
/// The router, cache and usage recorder never fail; errors only surface at
/// the configuration boundary and from the backend call made by the
/// [`Gateway`](crate::Gateway).
#[derive(Debug, thiserror::Error)]
pub enum HeimdallError {
    /// A model identifier string did not name any known [`ModelId`](crate::ModelId).
    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    // Backend errors
    #[error("backend error: {0}")]
    Backend(String),

    #[error("backend timed out after {0:?}")]
    Timeout(Duration),
}

impl HeimdallError {
    /// Whether a caller-side retry could reasonably succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::Timeout(_))
    }
}

/// Result type alias for Heimdall operations
pub type Result<T> = std::result::Result<T, HeimdallError>;
