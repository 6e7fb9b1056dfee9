//! PostgreSQL error classification.

/// `foreign_key_violation`
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// `unique_violation`
pub const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE of a database error, if the error came from the server.
pub fn code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// Whether the error is a foreign-key violation.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    code(err).as_deref() == Some(FOREIGN_KEY_VIOLATION)
}

/// Whether the error is a unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    code(err).as_deref() == Some(UNIQUE_VIOLATION)
}

/// Name of the violated constraint, e.g. `fk_department_leaderships_department`.
pub fn constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

/// Whether the error is a connectivity or pool problem worth retrying.
pub fn is_transient(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Tls(_)
    ) || code(err).is_some_and(|c| {
        // Class 08: connection exception. 40001/40P01: serialization failure, deadlock.
        c.starts_with("08") || c == "40001" || c == "40P01"
    })
}
