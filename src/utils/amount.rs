use serde_json::Value;

/// Number of nanotons in one TON
pub(crate) const NANOTON_PER_TON: f64 = 1e9;

/// Decimal places kept for ledger amounts
pub(crate) const LEDGER_DECIMALS: i32 = 6;

/// Round `value` to `places` decimal places, half away from zero.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Round a ledger amount to [`LEDGER_DECIMALS`] places.
pub(crate) fn round_ledger(value: f64) -> f64 {
    round_to(value, LEDGER_DECIMALS)
}

/// Convert an on-chain nanoton amount to TON.
pub(crate) fn nano_to_ton(value_nano: u64) -> f64 {
    value_nano as f64 / NANOTON_PER_TON
}

/// Coerce a JSON value into a usable amount.
///
/// Numbers and numeric strings are accepted. Zero, negative, non-finite and
/// non-numeric input yields `None`.
pub(crate) fn coerce_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    (amount.is_finite() && amount > 0.0).then_some(amount)
}
