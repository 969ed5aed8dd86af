//! Error types for the Convex library.

use thiserror::Error;

/// A specialized Result type for Convex operations.
pub type ConvexResult<T> = Result<T, ConvexError>;

/// The main error type for date and convention handling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvexError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },
}

impl ConvexError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }
}
