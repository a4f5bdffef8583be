use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::time::Duration;
use tracing::info;

use crate::store::errors::StoreError;
use crate::store::models::{
    NewWithdrawal, WithdrawalId, WithdrawalRequest, WithdrawalRow, WithdrawalStatus,
};
use crate::store::traits::{Ledger, WithdrawalStore};

/// Initialize the SQLite connection pool.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Runs all necessary migrations for the ledger.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Ledger and withdrawal queue backed by SQLite
#[derive(Debug, Clone)]
pub(crate) struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and bring the schema up to date.
    pub(crate) async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = init_pool(database_url).await?;
        run_migrations(&pool).await?;
        info!("Ledger store ready");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Ledger for SqliteStore {
    async fn balance(&self, uid: &str) -> Result<f64, StoreError> {
        let balance: Option<f64> =
            sqlx::query_scalar("SELECT balance_ton FROM users WHERE uid = ?1")
                .bind(uid)
                .fetch_optional(&self.pool)
                .await?;

        Ok(balance.unwrap_or(0.0))
    }

    async fn set_balance(&self, uid: &str, balance: f64) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (uid, balance_ton) VALUES (?1, ?2)
            ON CONFLICT(uid) DO UPDATE SET balance_ton = excluded.balance_ton
            "#,
        )
        .bind(uid)
        .bind(balance)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn first_deposit_at(&self, uid: &str) -> Result<Option<i64>, StoreError> {
        let at: Option<Option<i64>> =
            sqlx::query_scalar("SELECT first_deposit_at FROM users WHERE uid = ?1")
                .bind(uid)
                .fetch_optional(&self.pool)
                .await?;

        Ok(at.flatten())
    }

    async fn set_first_deposit_at(&self, uid: &str, at: i64) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (uid, first_deposit_at) VALUES (?1, ?2)
            ON CONFLICT(uid) DO UPDATE
            SET first_deposit_at = COALESCE(users.first_deposit_at, excluded.first_deposit_at)
            "#,
        )
        .bind(uid)
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl WithdrawalStore for SqliteStore {
    async fn insert_withdrawal(&self, request: NewWithdrawal) -> Result<WithdrawalId, StoreError> {
        let id = WithdrawalId::generate();

        sqlx::query(
            r#"
            INSERT INTO withdraw_queue (id, uid, address, amount, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(id.as_str())
        .bind(&request.uid)
        .bind(&request.address)
        .bind(request.amount)
        .bind(WithdrawalStatus::Queued.as_str())
        .bind(request.created_at)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn advance_queued(
        &self,
        limit: u32,
        processed_at: i64,
    ) -> Result<Vec<WithdrawalRequest>, StoreError> {
        // A single statement keeps selection and update atomic, so two
        // concurrent batches never advance the same request.
        let rows: Vec<WithdrawalRow> = sqlx::query_as(
            r#"
            UPDATE withdraw_queue
            SET status = ?1, processed_at = ?2
            WHERE id IN (
                SELECT id FROM withdraw_queue
                WHERE status = ?3
                ORDER BY id
                LIMIT ?4
            )
            RETURNING id, uid, address, amount, status, created_at, processed_at
            "#,
        )
        .bind(WithdrawalStatus::Done.as_str())
        .bind(processed_at)
        .bind(WithdrawalStatus::Queued.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        let mut advanced = rows
            .into_iter()
            .map(WithdrawalRequest::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        advanced.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(advanced)
    }

    async fn withdrawal(&self, id: &WithdrawalId) -> Result<Option<WithdrawalRequest>, StoreError> {
        let row: Option<WithdrawalRow> = sqlx::query_as(
            r#"
            SELECT id, uid, address, amount, status, created_at, processed_at
            FROM withdraw_queue
            WHERE id = ?1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(WithdrawalRequest::try_from).transpose()
    }
}

/// Single-connection in-memory store for tests.
#[cfg(test)]
pub(crate) async fn memory_store() -> SqliteStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    SqliteStore::new(pool)
}
