//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RepositoryError (kitchenpos-core) ← What the repository traits return │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CoreError::Repository ← What a service caller sees                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kitchenpos_core::{CoreError, Id, RepositoryError};
use thiserror::Error;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging.
#[derive(Debug, Error)]
pub enum DbError {
    /// An update targeted a row that does not exist.
    ///
    /// ## When This Occurs
    /// - `save` with an id that was never inserted
    /// - `fetch_one` returns no rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Id },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Order on a non-existent order_table
    /// - Menu in a non-existent menu_group
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation.
    ///
    /// ## When This Occurs
    /// - Negative price reaching the database
    /// - Unknown order status string
    #[error("Check constraint violation: {message}")]
    CheckViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    ///
    /// ## When This Occurs
    /// - Invalid SQL in migration
    /// - Migration version conflict
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: &'static str, id: Id) -> Self {
        DbError::NotFound { entity, id }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record",
                id: 0,
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports constraints as
                // "FOREIGN KEY constraint failed" / "CHECK constraint failed: <expr>"
                if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Hands database failures to the services through the repository traits.
impl From<DbError> for RepositoryError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => RepositoryError::NotFound { entity, id },
            other => RepositoryError::Storage(other.to_string()),
        }
    }
}

/// Lets a unit of work fail with the services' own error type.
impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        CoreError::Repository(err.into())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_repository_not_found() {
        let err: RepositoryError = DbError::not_found("OrderTable", 9).into();
        assert_eq!(err, RepositoryError::not_found("OrderTable", 9));
    }

    #[test]
    fn test_db_error_is_a_repository_core_error() {
        let err: CoreError = DbError::not_found("TableGroup", 4).into();
        assert!(!err.is_invalid_argument());
        assert!(matches!(
            err,
            CoreError::Repository(RepositoryError::NotFound { id: 4, .. })
        ));
    }

    #[test]
    fn test_other_errors_map_to_storage() {
        let err: RepositoryError = DbError::PoolExhausted.into();
        assert_eq!(
            err,
            RepositoryError::Storage("Connection pool exhausted".to_string())
        );
    }
}
