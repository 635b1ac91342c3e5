//! Error types for gaia-observability.

use thiserror::Error;

/// Errors that can occur while wiring metrics.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// A metric could not be created or registered.
    #[error("metric registration failed: {0}")]
    Registration(#[from] prometheus::Error),
}

/// Result type for observability operations.
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;
