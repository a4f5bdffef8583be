pub(crate) mod handlers;
pub(crate) mod types;

use axum::{routing::post, Router};
use std::{path::Path, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
};

use crate::deposits::matcher::DepositMatcher;
use crate::withdrawals::queue::WithdrawalQueue;

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub(crate) struct AppState {
    matcher: Arc<DepositMatcher>,
    queue: Arc<WithdrawalQueue>,
}

impl AppState {
    pub(crate) fn new(matcher: Arc<DepositMatcher>, queue: Arc<WithdrawalQueue>) -> Self {
        Self { matcher, queue }
    }

    pub(crate) fn matcher(&self) -> &DepositMatcher {
        &self.matcher
    }

    pub(crate) fn queue(&self) -> &WithdrawalQueue {
        &self.queue
    }
}

/// Build the API router. Paths outside `/api` are served from `static_dir`.
pub(crate) fn router(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let index = ServeFile::new(Path::new(static_dir).join("index.html"));

    Router::new()
        .route("/api/checkDeposit", post(handlers::check_deposit))
        .route("/api/requestWithdrawal", post(handlers::request_withdrawal))
        .route("/api/admin/processPayout", post(handlers::process_payout))
        .route_service("/", index)
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(cors)
}
