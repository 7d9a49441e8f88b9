//! Instrument domain errors
//!
//! Two layers of errors live here. `StoreError` is what a storage adapter
//! reports through the repository and session ports; `InstrumentError` is
//! what the service layer hands to its callers.

use thiserror::Error;

use core_kernel::CoreError;

/// Errors reported by storage adapters
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not provide a session (pool exhausted, connection refused)
    #[error("Storage unavailable: {0}")]
    ResourceUnavailable(String),

    /// A lookup expected at most one row but the filter matched several
    #[error("Ambiguous result: filter matched {matched} rows, expected at most one")]
    AmbiguousResult { matched: u64 },

    /// A constraint in the store rejected the write
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// The query itself failed
    #[error("Query failed: {0}")]
    Query(String),

    /// The session was already committed, rolled back or closed
    #[error("Session is no longer active")]
    SessionClosed,
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::ResourceUnavailable(message.into())
    }

    pub fn query(message: impl Into<String>) -> Self {
        StoreError::Query(message.into())
    }

    /// Returns true if retrying the whole request may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::ResourceUnavailable(_))
    }
}

/// Errors returned by the instrument service
#[derive(Debug, Error)]
pub enum InstrumentError {
    /// A caller-supplied value failed a domain constraint
    #[error("{0}")]
    InvalidArgument(String),

    /// A value object could not be constructed
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The storage layer failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InstrumentError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        InstrumentError::InvalidArgument(message.into())
    }

    /// Returns true if the caller, not the system, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, InstrumentError::InvalidArgument(_) | InstrumentError::Core(_))
    }

    /// Returns true if the store could not provide a session
    pub fn is_unavailable(&self) -> bool {
        matches!(self, InstrumentError::Store(StoreError::ResourceUnavailable(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_is_transient() {
        assert!(StoreError::unavailable("pool timed out").is_transient());
        assert!(!StoreError::query("syntax error").is_transient());
        assert!(!StoreError::AmbiguousResult { matched: 2 }.is_transient());
    }

    #[test]
    fn test_invalid_argument_displays_message_only() {
        let error = InstrumentError::invalid_argument("Number of dates must be a positive integer");
        assert_eq!(error.to_string(), "Number of dates must be a positive integer");
        assert!(error.is_client_error());
    }

    #[test]
    fn test_store_error_converts() {
        let error: InstrumentError = StoreError::unavailable("refused").into();
        assert!(error.is_unavailable());
        assert!(!error.is_client_error());
    }
}
