use async_trait::async_trait;
use std::fmt::Debug;

use crate::ton::errors::TransactionSourceError;
use crate::ton::types::TonTransaction;

/// Source of recent incoming transactions for the receiving wallet
#[async_trait]
pub(crate) trait TransactionSource: Send + Sync + Debug {
    /// Fetch up to `limit` most recent transactions, newest first.
    async fn fetch_incoming(&self, limit: u32)
        -> Result<Vec<TonTransaction>, TransactionSourceError>;
}
