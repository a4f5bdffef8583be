use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use tracing::{error, warn};

use crate::api::types::{
    coerce_identifier, ApiResponse, CheckDepositRequest, ProcessPayoutRequest,
    WithdrawalRequestBody,
};
use crate::api::AppState;
use crate::deposits::types::{DepositError, DepositOutcome};
use crate::utils::amount::coerce_amount;
use crate::withdrawals::types::QueueError;

/// Unreadable bodies are handled like empty ones.
fn body_or_default<T: Default>(body: Result<Json<T>, JsonRejection>) -> T {
    match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!(%rejection, "Unreadable request body");
            T::default()
        }
    }
}

/// HTTP handler for POST `/api/checkDeposit`
pub(crate) async fn check_deposit(
    State(state): State<AppState>,
    body: Result<Json<CheckDepositRequest>, JsonRejection>,
) -> Json<ApiResponse> {
    let body = body_or_default(body);
    let uid = coerce_identifier(body.uid.as_ref()).unwrap_or_default();
    let Some(amount) = body.amount.as_ref().and_then(coerce_amount) else {
        return Json(ApiResponse::bad_params());
    };

    let response = match state.matcher().check_deposit(&uid, amount).await {
        Ok(DepositOutcome::Credited { credited }) => ApiResponse::credited(credited),
        // Callers cannot tell an unreachable API from a missing transaction
        Ok(DepositOutcome::NoMatch | DepositOutcome::UpstreamUnavailable) => ApiResponse::failed(),
        Err(DepositError::BadParams) => ApiResponse::bad_params(),
        Err(e) => {
            error!(%uid, error = %e, "Deposit check failed");
            ApiResponse::exception()
        }
    };

    Json(response)
}

/// HTTP handler for POST `/api/requestWithdrawal`
pub(crate) async fn request_withdrawal(
    State(state): State<AppState>,
    body: Result<Json<WithdrawalRequestBody>, JsonRejection>,
) -> Json<ApiResponse> {
    let body = body_or_default(body);
    let uid = coerce_identifier(body.uid.as_ref()).unwrap_or_default();
    let address = coerce_identifier(body.address.as_ref()).unwrap_or_default();
    let Some(amount) = body.amount.as_ref().and_then(coerce_amount) else {
        return Json(ApiResponse::bad_params());
    };

    let response = match state.queue().enqueue(&uid, &address, amount).await {
        Ok(_) => ApiResponse::ok(),
        Err(QueueError::BadParams) => ApiResponse::bad_params(),
        Err(e) => {
            error!(%uid, error = %e, "Withdrawal request failed");
            ApiResponse::failed()
        }
    };

    Json(response)
}

/// HTTP handler for POST `/api/admin/processPayout`
pub(crate) async fn process_payout(
    State(state): State<AppState>,
    body: Result<Json<ProcessPayoutRequest>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse>) {
    let secret = body_or_default(body).secret.unwrap_or_default();

    match state.queue().advance_batch(&secret).await {
        Ok(processed) => (StatusCode::OK, Json(ApiResponse::processed(processed))),
        Err(QueueError::Unauthorized) => (StatusCode::FORBIDDEN, Json(ApiResponse::failed())),
        Err(e) => {
            error!(error = %e, "Payout batch failed");
            (StatusCode::OK, Json(ApiResponse::failed()))
        }
    }
}
