//! Storage-specific error type wrapping sqlx errors.

use locpack_domain::error::LocpackError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query, transaction or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Whether `err` is a `UNIQUE` or primary key constraint failure.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

impl From<StorageError> for LocpackError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
