//! Error types for rdFC pattern analysis
//!
//! Every error is a deterministic consequence of the input, so none of them
//! is retried. Degenerate individual pattern cells are not errors; they are
//! zero-filled by the generator.

use thiserror::Error;

use crate::types::Channel;

/// Errors raised by the filter stage, pattern generator and match scorer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RdfcError {
    /// Bad sampling rate, unsupported notch frequency or infeasible filter design
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// What was wrong with the parameter
        reason: String,
    },

    /// Input epoch or pattern matrix has the wrong dimensions
    #[error("Shape mismatch in {what}: expected {expected}, found {actual}")]
    ShapeMismatch {
        /// Which dimension was checked (e.g. "epoch rows")
        what: &'static str,
        /// Expected size
        expected: usize,
        /// Actual size
        actual: usize,
    },

    /// A whole input channel is constant, so order-1 connectivity is undefined
    #[error("Degenerate signal: channel {channel} has zero variance")]
    DegenerateSignal {
        /// The constant channel
        channel: Channel,
    },
}

impl RdfcError {
    /// Shorthand for an [`RdfcError::InvalidParameter`] with a formatted reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter { reason: reason.into() }
    }

    /// Shorthand for an [`RdfcError::ShapeMismatch`].
    pub const fn shape(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch { what, expected, actual }
    }
}

/// Result alias used across the rdFC crates.
pub type RdfcResult<T> = Result<T, RdfcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RdfcError::invalid("sampling rate must be positive");
        assert_eq!(err.to_string(), "Invalid parameter: sampling rate must be positive");

        let err = RdfcError::shape("epoch rows", 3, 4);
        assert_eq!(err.to_string(), "Shape mismatch in epoch rows: expected 3, found 4");

        let err = RdfcError::DegenerateSignal { channel: Channel::B };
        assert_eq!(err.to_string(), "Degenerate signal: channel B has zero variance");
    }
}
