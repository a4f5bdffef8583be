use thiserror::Error;

/// Error types for ledger and queue persistence
#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("invalid withdrawal status: {0}")]
    InvalidStatus(String),
}
