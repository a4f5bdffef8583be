use async_trait::async_trait;
use std::fmt::Debug;

use crate::store::errors::StoreError;
use crate::store::models::{NewWithdrawal, WithdrawalId, WithdrawalRequest};

/// Per-user balance records. Absent users read as a zero balance.
#[async_trait]
pub(crate) trait Ledger: Send + Sync + Debug {
    /// Current TON balance of `uid`
    async fn balance(&self, uid: &str) -> Result<f64, StoreError>;

    /// Overwrite the TON balance of `uid`
    async fn set_balance(&self, uid: &str, balance: f64) -> Result<(), StoreError>;

    /// Time of the first credited deposit, in epoch millis
    async fn first_deposit_at(&self, uid: &str) -> Result<Option<i64>, StoreError>;

    /// Record the first deposit time. An existing value is kept.
    async fn set_first_deposit_at(&self, uid: &str, at: i64) -> Result<(), StoreError>;
}

/// Persistence for the withdrawal queue
#[async_trait]
pub(crate) trait WithdrawalStore: Send + Sync + Debug {
    /// Persist a new request with status `queued` and return its id.
    async fn insert_withdrawal(&self, request: NewWithdrawal) -> Result<WithdrawalId, StoreError>;

    /// Mark up to `limit` queued requests as done, oldest first, in one
    /// atomic update. Returns the advanced requests.
    async fn advance_queued(
        &self,
        limit: u32,
        processed_at: i64,
    ) -> Result<Vec<WithdrawalRequest>, StoreError>;

    /// Fetch a request by id
    async fn withdrawal(&self, id: &WithdrawalId) -> Result<Option<WithdrawalRequest>, StoreError>;
}
