mod api;
mod config;
mod deposits;
mod store;
mod ton;
mod utils;
mod withdrawals;

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    api::{router, AppState},
    config::ServiceConfig,
    deposits::matcher::DepositMatcher,
    store::db::SqliteStore,
    ton::client::TonApiClient,
    withdrawals::{payout::LoggingPayoutExecutor, queue::WithdrawalQueue},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Arc::new(ServiceConfig::from_env().context("invalid configuration")?);

    let store = Arc::new(
        SqliteStore::connect(config.database_url())
            .await
            .context("failed to open ledger store")?,
    );

    let source = TonApiClient::from_config(&config).context("failed to build tonapi client")?;

    let matcher = Arc::new(DepositMatcher::new(Arc::new(source), store.clone()));
    let queue = Arc::new(WithdrawalQueue::new(
        store,
        Arc::new(LoggingPayoutExecutor),
        config.admin_secret().to_string(),
    ));

    let app = router(AppState::new(matcher, queue), config.static_dir());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port()));
    info!(%addr, "Server running at http://");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(%e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutting down");
}
