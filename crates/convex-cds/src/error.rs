//! Error types for CDS pricing.

use convex_core::ConvexError;
use convex_curves::CurveError;
use thiserror::Error;

/// A specialized Result type for CDS operations.
pub type CdsResult<T> = Result<T, CdsError>;

/// Errors that can occur while building or pricing a CDS.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CdsError {
    /// Inputs cannot be priced (step-in before pricing date, malformed contract).
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of what's invalid.
        reason: String,
    },

    /// Missing required builder field.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// The hazard rate root finder failed to bracket or converge.
    #[error("Hazard rate calibration failed: {reason}")]
    CalibrationFailure {
        /// Description of the solver failure.
        reason: String,
    },

    /// Date or convention error.
    #[error(transparent)]
    Core(#[from] ConvexError),

    /// Curve construction error.
    #[error(transparent)]
    Curve(#[from] CurveError),
}

impl CdsError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates a calibration failure error.
    #[must_use]
    pub fn calibration_failure(reason: impl Into<String>) -> Self {
        Self::CalibrationFailure {
            reason: reason.into(),
        }
    }
}
