//! Error types for the changefinder library.

use thiserror::Error;

/// Result type alias for detector operations.
pub type Result<T> = std::result::Result<T, ChangeFinderError>;

/// Errors that can occur while building or updating a detector.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChangeFinderError {
    /// Fewer past points than the AR order were supplied to an update.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Computation error (non-finite input or model state).
    #[error("computation error: {0}")]
    ComputationError(String),
}
