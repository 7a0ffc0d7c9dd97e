//! Error types for the incentive core library.
//!
//! Scoring never fails; these errors only come out of amount parsing,
//! payout construction and service metadata validation.

use thiserror::Error;

/// Errors that can occur in incent core operations.
#[derive(Debug, Error)]
pub enum IncentError {
    /// Malformed or out-of-range amount.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Payout request or record failed validation.
    #[error("Invalid payout: {0}")]
    InvalidPayout(String),

    /// Service metadata failed validation.
    #[error("Invalid service metadata: {0}")]
    InvalidMetadata(String),

    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for incent core operations.
pub type Result<T> = std::result::Result<T, IncentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IncentError::InvalidPayout("reviewer is the zero address".to_string());
        assert!(err.to_string().contains("Invalid payout"));
        assert!(err.to_string().contains("zero address"));
    }
}
