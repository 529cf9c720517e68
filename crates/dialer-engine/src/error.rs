//! Error types for the dialer engine.

use thiserror::Error;

use crate::types::NumberId;

/// Result type for dialer operations.
pub type Result<T> = std::result::Result<T, DialerError>;

/// Errors that can occur while operating the dialer.
///
/// None of these are fatal; every failure leaves prior state untouched.
#[derive(Debug, Error)]
pub enum DialerError {
    /// Manual add rejected before enqueue (empty or malformed phone)
    #[error("invalid number: {message}")]
    InvalidNumber { message: String },

    /// `start()` called with no entry in `waiting` status
    #[error("no waiting numbers in the queue")]
    NoWaitingNumbers,

    /// `start()` called while a batch is already running
    #[error("a dialing batch is already running")]
    AlreadyRunning,

    /// Queue entry lookup failed
    #[error("number not found: {id}")]
    NumberNotFound { id: NumberId },

    /// Removal attempted while the number is mid-call
    #[error("number {id} has a call in progress and cannot be removed")]
    NumberInCall { id: NumberId },

    /// `start()` called with a batch size outside the supported set
    #[error("unsupported batch size: {size}")]
    InvalidBatchSize { size: usize },
}

impl DialerError {
    /// Create an invalid number error
    pub fn invalid_number(message: impl Into<String>) -> Self {
        Self::InvalidNumber {
            message: message.into(),
        }
    }

    /// Create a not-found error for a queue entry
    pub fn not_found(id: &NumberId) -> Self {
        Self::NumberNotFound { id: id.clone() }
    }

    /// Create a mid-call removal error
    pub fn in_call(id: &NumberId) -> Self {
        Self::NumberInCall { id: id.clone() }
    }
}
