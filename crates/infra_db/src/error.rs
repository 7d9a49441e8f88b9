//! Database error types
//!
//! Errors raised by the PostgreSQL layer, and their translation into the
//! `StoreError` the domain ports speak.

use domain_instrument::StoreError;
use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Check or not-null constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Value does not fit its column
    #[error("Value too long: {0}")]
    ValueTooLong(String),

    /// Transaction error
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::ConstraintViolation(_)
                | DatabaseError::ValueTooLong(_)
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

/// Converts SQLx errors to more specific DatabaseError variants
///
/// Database errors are classified by their PostgreSQL error code.
impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                let message = db_err.message().to_string();
                match db_err.code().as_deref() {
                    Some("23505") => DatabaseError::DuplicateEntry(message),
                    Some("23502") | Some("23514") => DatabaseError::ConstraintViolation(message),
                    Some("22001") => DatabaseError::ValueTooLong(message),
                    _ => DatabaseError::QueryFailed(message),
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::from(&error)
    }
}

impl From<DatabaseError> for StoreError {
    fn from(error: DatabaseError) -> Self {
        if error.is_connection_error() {
            StoreError::ResourceUnavailable(error.to_string())
        } else if error.is_constraint_violation() {
            StoreError::Constraint(error.to_string())
        } else {
            StoreError::Query(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_unavailable() {
        let db_error = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(db_error.is_connection_error());

        let store_error = StoreError::from(db_error);
        assert!(store_error.is_transient());
    }

    #[test]
    fn test_row_not_found_is_query_failure() {
        let db_error = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(matches!(db_error, DatabaseError::QueryFailed(_)));
        assert!(matches!(StoreError::from(db_error), StoreError::Query(_)));
    }

    #[test]
    fn test_constraint_maps_to_store_constraint() {
        let db_error = DatabaseError::ValueTooLong("oil_id".to_string());
        assert!(db_error.is_constraint_violation());
        assert!(!db_error.is_connection_error());

        let store_error = StoreError::from(db_error);
        assert_eq!(store_error, StoreError::Constraint("Value too long: oil_id".to_string()));
    }

    #[test]
    fn test_migration_failure_is_query_failure() {
        let db_error = DatabaseError::MigrationFailed("checksum mismatch".to_string());
        assert!(!db_error.is_constraint_violation());
        assert!(matches!(StoreError::from(db_error), StoreError::Query(_)));
    }
}
