//! Mapping of datastore failures onto [`CoreError`].

use dulpromax_core::error::CoreError;

/// Result type returned by every repository method.
pub type StoreResult<T> = Result<T, CoreError>;

/// Classify a sqlx error at the store boundary.
///
/// - Unique constraint violations (`23505`) become [`CoreError::Conflict`].
/// - Everything else becomes [`CoreError::Upstream`] carrying the driver's
///   message.
pub fn store_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            return CoreError::Conflict(format!(
                "duplicate value violates unique constraint: {constraint}"
            ));
        }
    }
    tracing::error!(error = %err, "Datastore call failed");
    CoreError::Upstream(err.to_string())
}

/// Error for a poisoned in-memory store lock.
pub(crate) fn poisoned(store: &'static str) -> CoreError {
    CoreError::Internal(format!("{store} store lock poisoned"))
}
