use thiserror::Error;

/// Error types for transaction source queries
#[derive(Debug, Error)]
pub(crate) enum TransactionSourceError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP error {0} from transaction API")]
    Status(u16),
}
