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
//! │  Logged once at the repository boundary, then returned                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller matches on kind(), or collapses with unwrap_or_default()       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Coarse classification of a [`DbError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A session could not be opened.
    Connection,
    /// A statement failed to execute or a row failed to map.
    Query,
}

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and caller-side handling.
#[derive(Debug, Error)]
pub enum DbError {
    /// Opening a session failed.
    ///
    /// ## When This Occurs
    /// - Address cannot be parsed as a connection string
    /// - Database file missing and `create_if_missing` is off
    /// - File permissions issue
    #[error("Connection to {address} failed: {source}")]
    ConnectionFailed {
        address: String,
        #[source]
        source: sqlx::Error,
    },

    /// Unique constraint violation.
    #[error("Duplicate value for {field}")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Review for a non-existent product
    /// - Product in a non-existent category
    /// - Deleting a category that still has products
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A result row could not be mapped to an entity.
    #[error("Cannot map column {column}: {message}")]
    Mapping { column: String, message: String },

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a ConnectionFailed error for the given address.
    pub fn connection(address: impl Into<String>, source: sqlx::Error) -> Self {
        DbError::ConnectionFailed {
            address: address.into(),
            source,
        }
    }

    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::ConnectionFailed { .. } => ErrorKind::Connection,
            _ => ErrorKind::Query,
        }
    }

    /// True when no session could be opened.
    pub fn is_connection(&self) -> bool {
        self.kind() == ErrorKind::Connection
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database        → Analyze message for constraint type
/// sqlx::Error::ColumnNotFound  → DbError::Mapping
/// sqlx::Error::ColumnDecode    → DbError::Mapping
/// sqlx::Error::Io / Tls        → DbError::QueryFailed (session dropped mid-call)
/// Other                        → DbError::Internal
/// ```
///
/// Connection failures never go through this conversion; the connection
/// provider builds [`DbError::ConnectionFailed`] itself so the address is kept.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite error messages for constraints:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::ColumnNotFound(column) => DbError::Mapping {
                column,
                message: "column not found".to_string(),
            },

            sqlx::Error::ColumnDecode { index, source } => DbError::Mapping {
                column: index,
                message: source.to_string(),
            },

            sqlx::Error::Io(e) => DbError::QueryFailed(e.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================
