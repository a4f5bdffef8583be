use thiserror::Error;

use crate::store::errors::StoreError;

/// Result of checking a claimed deposit.
///
/// `NoMatch` and `UpstreamUnavailable` are kept apart for logging but look
/// identical to callers.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DepositOutcome {
    /// A matching transaction was found and the user was credited
    Credited { credited: f64 },
    /// No recent transaction matches the claim
    NoMatch,
    /// The transaction list could not be fetched
    UpstreamUnavailable,
}

/// Error types for deposit checks
#[derive(Debug, Error)]
pub(crate) enum DepositError {
    #[error("bad params")]
    BadParams,

    #[error("ledger update failed: {0}")]
    Store(#[from] StoreError),
}
