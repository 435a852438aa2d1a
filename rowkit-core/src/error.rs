use thiserror::Error;

/// Classified failure, found at the root of the `anyhow` chain returned by
/// every operation that talks to the database.
///
/// Drivers map their native errors into one of these kinds. Layers above only
/// add context, so the kind is recovered with [`DbError::of`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    /// Malformed DSN, unreachable server, broken or closed connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// NOT NULL, unique, foreign key, length or check violation.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// The server rejected the statement text.
    #[error("SQL syntax error: {0}")]
    Syntax(String),

    /// A query expected to return one row returned none.
    #[error("No row found in table `{table}`")]
    NotFound { table: &'static str },

    /// Any other failure reported by the server.
    #[error("Database error: {0}")]
    Database(String),
}

impl DbError {
    /// The classified kind behind `error`, if any.
    pub fn of(error: &crate::Error) -> Option<&DbError> {
        error
            .downcast_ref::<DbError>()
            .or_else(|| error.chain().find_map(|e| e.downcast_ref::<DbError>()))
    }

    pub fn is_connection(error: &crate::Error) -> bool {
        matches!(Self::of(error), Some(DbError::Connection(..)))
    }

    pub fn is_constraint(error: &crate::Error) -> bool {
        matches!(Self::of(error), Some(DbError::Constraint(..)))
    }

    pub fn is_syntax(error: &crate::Error) -> bool {
        matches!(Self::of(error), Some(DbError::Syntax(..)))
    }

    pub fn is_not_found(error: &crate::Error) -> bool {
        matches!(Self::of(error), Some(DbError::NotFound { .. }))
    }
}
