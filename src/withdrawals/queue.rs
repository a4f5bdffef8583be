use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::store::models::{NewWithdrawal, WithdrawalId};
use crate::store::traits::WithdrawalStore;
use crate::withdrawals::payout::PayoutExecutor;
use crate::withdrawals::types::QueueError;

/// Maximum number of requests advanced per batch
pub(crate) const BATCH_LIMIT: u32 = 10;

/// Queue of user withdrawal requests awaiting manual settlement
#[derive(Debug)]
pub(crate) struct WithdrawalQueue {
    store: Arc<dyn WithdrawalStore>,
    payout: Arc<dyn PayoutExecutor>,
    admin_secret: String,
}

impl WithdrawalQueue {
    pub(crate) fn new(
        store: Arc<dyn WithdrawalStore>,
        payout: Arc<dyn PayoutExecutor>,
        admin_secret: String,
    ) -> Self {
        Self {
            store,
            payout,
            admin_secret,
        }
    }

    /// Queue a withdrawal of `amount` TON to `address`.
    ///
    /// The caller is trusted to have debited the user already.
    pub(crate) async fn enqueue(
        &self,
        uid: &str,
        address: &str,
        amount: f64,
    ) -> Result<WithdrawalId, QueueError> {
        self.enqueue_at(uid, address, amount, Utc::now()).await
    }

    pub(crate) async fn enqueue_at(
        &self,
        uid: &str,
        address: &str,
        amount: f64,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalId, QueueError> {
        if uid.is_empty() || address.is_empty() || !amount.is_finite() || amount <= 0.0 {
            return Err(QueueError::BadParams);
        }

        let id = self
            .store
            .insert_withdrawal(NewWithdrawal {
                uid: uid.to_string(),
                address: address.to_string(),
                amount,
                created_at: now.timestamp_millis(),
            })
            .await?;

        info!(%id, %uid, %address, amount, "Queued withdrawal");
        Ok(id)
    }

    /// Mark up to [`BATCH_LIMIT`] queued requests as done and hand them to
    /// the payout executor. Returns the number advanced.
    pub(crate) async fn advance_batch(&self, secret: &str) -> Result<usize, QueueError> {
        self.advance_batch_at(secret, Utc::now()).await
    }

    pub(crate) async fn advance_batch_at(
        &self,
        secret: &str,
        now: DateTime<Utc>,
    ) -> Result<usize, QueueError> {
        if !secrets_match(secret, &self.admin_secret) {
            warn!("Rejected payout batch with wrong admin secret");
            return Err(QueueError::Unauthorized);
        }

        let advanced = self
            .store
            .advance_queued(BATCH_LIMIT, now.timestamp_millis())
            .await?;

        for request in &advanced {
            if let Err(e) = self.payout.execute(request).await {
                error!(id = %request.id, error = %e, "Payout hand-off failed");
            }
        }

        info!(processed = advanced.len(), "Advanced withdrawal batch");
        Ok(advanced.len())
    }
}

/// Compare secrets without short-circuiting on the first differing byte.
fn secrets_match(given: &str, expected: &str) -> bool {
    let (given, expected) = (given.as_bytes(), expected.as_bytes());
    if given.len() != expected.len() {
        return false;
    }

    given
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
