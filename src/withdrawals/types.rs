use thiserror::Error;

use crate::store::errors::StoreError;

/// Error types for withdrawal queue operations
#[derive(Debug, Error)]
pub(crate) enum QueueError {
    #[error("bad params")]
    BadParams,

    #[error("admin secret mismatch")]
    Unauthorized,

    #[error("queue persistence failed: {0}")]
    Store(#[from] StoreError),
}

/// Error reported by a payout executor
#[derive(Debug, Error)]
pub(crate) enum PayoutError {
    #[error("payout rejected: {0}")]
    Rejected(String),
}
