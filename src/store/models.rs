use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

use crate::store::errors::StoreError;

/// Lifecycle of a withdrawal request. Only `Queued -> Done` is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WithdrawalStatus {
    Queued,
    Done,
}

impl WithdrawalStatus {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            WithdrawalStatus::Queued => "queued",
            WithdrawalStatus::Done => "done",
        }
    }
}

impl Display for WithdrawalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WithdrawalStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(WithdrawalStatus::Queued),
            "done" => Ok(WithdrawalStatus::Done),
            other => Err(StoreError::InvalidStatus(other.to_string())),
        }
    }
}

/// Store-assigned withdrawal identifier, ordered by creation time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct WithdrawalId(String);

impl WithdrawalId {
    /// Generate a fresh time-ordered identifier
    pub(crate) fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for WithdrawalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for WithdrawalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Withdrawal request as accepted from a user, before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NewWithdrawal {
    /// Owning user
    pub(crate) uid: String,
    /// Destination address, free-form
    pub(crate) address: String,
    /// Amount in TON, already net of fees
    pub(crate) amount: f64,
    /// Creation time in epoch millis
    pub(crate) created_at: i64,
}

/// Withdrawal request stored in the queue.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WithdrawalRequest {
    pub(crate) id: WithdrawalId,
    pub(crate) uid: String,
    pub(crate) address: String,
    pub(crate) amount: f64,
    pub(crate) status: WithdrawalStatus,
    pub(crate) created_at: i64,
    /// Set only on transition to `Done`
    pub(crate) processed_at: Option<i64>,
}

/// Raw `withdraw_queue` row
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct WithdrawalRow {
    pub(crate) id: String,
    pub(crate) uid: String,
    pub(crate) address: String,
    pub(crate) amount: f64,
    pub(crate) status: String,
    pub(crate) created_at: i64,
    pub(crate) processed_at: Option<i64>,
}

impl TryFrom<WithdrawalRow> for WithdrawalRequest {
    type Error = StoreError;

    fn try_from(row: WithdrawalRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: WithdrawalId::from(row.id),
            uid: row.uid,
            address: row.address,
            amount: row.amount,
            status: row.status.parse()?,
            created_at: row.created_at,
            processed_at: row.processed_at,
        })
    }
}
