use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/checkDeposit`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CheckDepositRequest {
    /// String or number
    pub(crate) uid: Option<Value>,
    /// Number or numeric string
    pub(crate) amount: Option<Value>,
}

/// Body of `POST /api/requestWithdrawal`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct WithdrawalRequestBody {
    /// String or number
    pub(crate) uid: Option<Value>,
    pub(crate) address: Option<Value>,
    /// Number or numeric string
    pub(crate) amount: Option<Value>,
}

/// Body of `POST /api/admin/processPayout`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProcessPayoutRequest {
    pub(crate) secret: Option<String>,
}

/// Coerce a JSON identifier into a string.
///
/// Non-empty strings are kept as sent and non-zero numbers use their JSON
/// text. Anything else is treated as missing.
pub(crate) fn coerce_identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// JSON envelope shared by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ApiResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    credited: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    processed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

impl ApiResponse {
    /// `{ok: true}`
    pub(crate) fn ok() -> Self {
        Self {
            ok: true,
            credited: None,
            processed: None,
            error: None,
        }
    }

    /// `{ok: false}`
    pub(crate) fn failed() -> Self {
        Self {
            ok: false,
            ..Self::ok()
        }
    }

    pub(crate) fn credited(credited: f64) -> Self {
        Self {
            credited: Some(credited),
            ..Self::ok()
        }
    }

    pub(crate) fn processed(processed: usize) -> Self {
        Self {
            processed: Some(processed),
            ..Self::ok()
        }
    }

    pub(crate) fn bad_params() -> Self {
        Self {
            error: Some("bad params"),
            ..Self::failed()
        }
    }

    pub(crate) fn exception() -> Self {
        Self {
            error: Some("exception"),
            ..Self::failed()
        }
    }
}
