//! Error types for gaia-core.
//!
//! The core distinguishes exactly two failure kinds: rejected input
//! (per-call, state untouched) and internal invariant violations
//! (programming defects, never expected at runtime).

use thiserror::Error;

/// Errors that can surface from the GAIA core engine.
#[derive(Debug, Error)]
pub enum GaiaError {
    /// Input sample was rejected by validation. No state was modified.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// An internal invariant was violated. This indicates a defect in the
    /// engine itself, not a recoverable runtime condition.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

impl GaiaError {
    /// Build a validation error for a named field.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Whether this error is a per-call input rejection.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Result type for core operations.
pub type GaiaResult<T> = Result<T, GaiaError>;
