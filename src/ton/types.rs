use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;

use crate::utils::amount::nano_to_ton;

/// Body of `GET /v2/blockchain/getTransactions`.
///
/// Only the fields used for deposit matching are kept.
#[derive(Debug, Deserialize)]
pub(crate) struct TransactionsResponse {
    #[serde(default, deserialize_with = "skip_malformed")]
    pub(crate) transactions: Vec<TonTransaction>,
}

/// Parses each transaction on its own, dropping entries that do not fit
/// [`TonTransaction`] instead of failing the whole list.
fn skip_malformed<'de, D>(deserializer: D) -> Result<Vec<TonTransaction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Value> = Deserialize::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|tx| serde_json::from_value(tx).ok())
        .collect())
}

/// Incoming message of a transaction
#[derive(Debug, Clone, Deserialize)]
struct InMessage {
    #[serde(default = "zero_nano", deserialize_with = "lenient_nano")]
    value: Option<u64>,
}

fn zero_nano() -> Option<u64> {
    Some(0)
}

/// Accepts the value as a JSON number or a numeric string.
///
/// Anything unparsable becomes `None` so the transaction can never match.
fn lenient_nano<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => Some(0),
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
}

/// Transaction time as sent by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum UnixTime {
    /// Absent, null or zero
    #[default]
    Missing,
    At(i64),
    /// Present but not a usable number
    Invalid,
}

/// Accepts integer, float and numeric string timestamps.
fn lenient_utime<'de, D>(deserializer: D) -> Result<UnixTime, D::Error>
where
    D: Deserializer<'de>,
{
    let from_float = |f: f64| {
        if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            UnixTime::At(f.floor() as i64)
        } else {
            UnixTime::Invalid
        }
    };

    let value = Value::deserialize(deserializer)?;
    let utime = match value {
        Value::Null => UnixTime::Missing,
        Value::Number(n) => match n.as_i64() {
            Some(t) => UnixTime::At(t),
            None => n.as_f64().map_or(UnixTime::Invalid, from_float),
        },
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(t) => UnixTime::At(t),
                Err(_) => s.parse::<f64>().map_or(UnixTime::Invalid, from_float),
            }
        }
        _ => UnixTime::Invalid,
    };

    Ok(match utime {
        UnixTime::At(0) => UnixTime::Missing,
        other => other,
    })
}

/// A transaction on the receiving wallet, as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TonTransaction {
    /// Transaction hash, used for logging only
    #[serde(default)]
    pub(crate) hash: Option<String>,

    /// Unix time of the transaction in seconds
    #[serde(default, deserialize_with = "lenient_utime")]
    utime: UnixTime,

    #[serde(default)]
    in_msg: Option<InMessage>,
}

impl TonTransaction {
    /// Create a transaction carrying `value_nano` on its incoming message.
    #[cfg(test)]
    pub(crate) fn new(value_nano: u64, utime: Option<i64>) -> Self {
        Self {
            hash: None,
            utime: utime.map_or(UnixTime::Missing, UnixTime::At),
            in_msg: Some(InMessage {
                value: Some(value_nano),
            }),
        }
    }

    /// Incoming value in nanotons; a missing message counts as zero.
    pub(crate) fn value_nano(&self) -> Option<u64> {
        match &self.in_msg {
            Some(msg) => msg.value,
            None => Some(0),
        }
    }

    /// Incoming value in TON
    pub(crate) fn value_ton(&self) -> Option<f64> {
        self.value_nano().map(nano_to_ton)
    }

    /// Occurrence time in Unix seconds, `now` when the API omits it.
    /// `None` when the API sent something that is not a time.
    pub(crate) fn occurred_at(&self, now: i64) -> Option<i64> {
        match self.utime {
            UnixTime::Missing | UnixTime::At(0) => Some(now),
            UnixTime::At(t) => Some(t),
            UnixTime::Invalid => None,
        }
    }
}
