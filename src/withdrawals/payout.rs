use async_trait::async_trait;
use std::fmt::Debug;
use tracing::info;

use crate::store::models::WithdrawalRequest;
use crate::withdrawals::types::PayoutError;

/// Settles a withdrawal once it has been marked `done`.
#[async_trait]
pub(crate) trait PayoutExecutor: Send + Sync + Debug {
    async fn execute(&self, request: &WithdrawalRequest) -> Result<(), PayoutError>;
}

/// Executor that only records the hand-off; disbursement happens elsewhere.
#[derive(Debug, Default)]
pub(crate) struct LoggingPayoutExecutor;

#[async_trait]
impl PayoutExecutor for LoggingPayoutExecutor {
    async fn execute(&self, request: &WithdrawalRequest) -> Result<(), PayoutError> {
        info!(
            id = %request.id,
            uid = %request.uid,
            address = %request.address,
            amount = request.amount,
            "Withdrawal ready for payout"
        );
        Ok(())
    }
}
