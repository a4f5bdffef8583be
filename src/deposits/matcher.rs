use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::deposits::locks::UserLocks;
use crate::deposits::types::{DepositError, DepositOutcome};
use crate::store::traits::Ledger;
use crate::ton::traits::TransactionSource;
use crate::ton::types::TonTransaction;
use crate::utils::amount::{round_ledger, NANOTON_PER_TON};

/// Number of recent transactions inspected per check
pub(crate) const TX_FETCH_LIMIT: u32 = 50;

/// Maximum age of a matching transaction, exclusive
pub(crate) const MATCH_WINDOW_SECS: i64 = 30 * 60;

/// Amount tolerance in nanotons (0.01 TON), exclusive
const AMOUNT_TOLERANCE_NANO: i128 = 10_000_000;

/// Share of a deposit credited to the user after the 10% fee
const CREDIT_FACTOR: f64 = 0.9;

/// Matches user-claimed deposits against recent wallet transactions and
/// credits the ledger.
#[derive(Debug)]
pub(crate) struct DepositMatcher {
    source: Arc<dyn TransactionSource>,
    ledger: Arc<dyn Ledger>,
    locks: UserLocks,
}

impl DepositMatcher {
    pub(crate) fn new(source: Arc<dyn TransactionSource>, ledger: Arc<dyn Ledger>) -> Self {
        Self {
            source,
            ledger,
            locks: UserLocks::new(),
        }
    }

    /// Check a claimed deposit of `amount` TON for `uid` against the current time.
    pub(crate) async fn check_deposit(
        &self,
        uid: &str,
        amount: f64,
    ) -> Result<DepositOutcome, DepositError> {
        self.check_deposit_at(uid, amount, Utc::now()).await
    }

    pub(crate) async fn check_deposit_at(
        &self,
        uid: &str,
        amount: f64,
        now: DateTime<Utc>,
    ) -> Result<DepositOutcome, DepositError> {
        if uid.is_empty() || !amount.is_finite() || amount <= 0.0 {
            return Err(DepositError::BadParams);
        }

        let txs = match self.source.fetch_incoming(TX_FETCH_LIMIT).await {
            Ok(txs) => txs,
            Err(e) => {
                warn!(%uid, error = %e, "Transaction fetch failed, treating as no match");
                return Ok(DepositOutcome::UpstreamUnavailable);
            }
        };

        let Some(found) = find_match(&txs, amount, now.timestamp()) else {
            info!(%uid, amount, inspected = txs.len(), "No matching deposit");
            return Ok(DepositOutcome::NoMatch);
        };

        let credited = round_ledger(amount * CREDIT_FACTOR);
        info!(%uid, amount, credited, tx = ?found.hash, "Matched deposit");

        self.credit(uid, credited, now).await?;

        Ok(DepositOutcome::Credited { credited })
    }

    /// Add `credited` to the balance of `uid` and stamp the first deposit time.
    async fn credit(&self, uid: &str, credited: f64, now: DateTime<Utc>) -> Result<(), DepositError> {
        let _guard = self.locks.lock(uid).await;

        let current = self.ledger.balance(uid).await?;
        let balance = round_ledger(current + credited);
        self.ledger.set_balance(uid, balance).await?;

        if self.ledger.first_deposit_at(uid).await?.is_none() {
            self.ledger
                .set_first_deposit_at(uid, now.timestamp_millis())
                .await?;
        }

        info!(%uid, credited, balance, "Credited deposit");
        Ok(())
    }
}

/// First transaction, in source order, younger than [`MATCH_WINDOW_SECS`]
/// and within 0.01 TON of `amount`. Transactions are never consumed, so the
/// same one can satisfy several claims.
pub(crate) fn find_match(
    txs: &[TonTransaction],
    amount: f64,
    now_secs: i64,
) -> Option<&TonTransaction> {
    let claimed_nano = (amount * NANOTON_PER_TON).round() as i128;

    txs.iter().find(|tx| {
        let Some(value_nano) = tx.value_nano() else {
            return false;
        };
        // Unusable or out-of-range upstream timestamps never match
        let Some(age) = tx
            .occurred_at(now_secs)
            .and_then(|at| now_secs.checked_sub(at))
        else {
            return false;
        };
        let diff = (i128::from(value_nano) - claimed_nano).abs();

        (0..MATCH_WINDOW_SECS).contains(&age) && diff < AMOUNT_TOLERANCE_NANO
    })
}
