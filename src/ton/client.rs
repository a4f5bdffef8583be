use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use crate::config::ServiceConfig;
use crate::ton::errors::TransactionSourceError;
use crate::ton::traits::TransactionSource;
use crate::ton::types::{TonTransaction, TransactionsResponse};

/// Timeout applied to every transaction API request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// tonapi.io client listing transactions of the receiving wallet
#[derive(Debug)]
pub(crate) struct TonApiClient {
    http: reqwest::Client,
    base_url: String,
    account: String,
    api_key: String,
}

impl TonApiClient {
    pub(crate) fn new(
        base_url: String,
        account: String,
        api_key: String,
    ) -> Result<Self, TransactionSourceError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            account,
            api_key,
        })
    }

    pub(crate) fn from_config(config: &ServiceConfig) -> Result<Self, TransactionSourceError> {
        Self::new(
            config.tonapi_url().to_string(),
            config.owner_wallet().to_string(),
            config.tonapi_key().to_string(),
        )
    }
}

#[async_trait]
impl TransactionSource for TonApiClient {
    async fn fetch_incoming(
        &self,
        limit: u32,
    ) -> Result<Vec<TonTransaction>, TransactionSourceError> {
        let url = format!("{}/v2/blockchain/getTransactions", self.base_url);
        let limit = limit.to_string();

        let mut request = self
            .http
            .get(&url)
            .query(&[("account", self.account.as_str()), ("limit", limit.as_str())]);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(TransactionSourceError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let parsed: TransactionsResponse = serde_json::from_slice(&body)?;
        info!(count = parsed.transactions.len(), "Fetched wallet transactions");

        Ok(parsed.transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::TonApiClient;
    use crate::ton::errors::TransactionSourceError;
    use crate::ton::traits::TransactionSource;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_fetch_incoming() {
        let mut server = Server::new_async().await;

        let mock_endpoint = server
            .mock("GET", Matcher::Regex(r"^/v2/blockchain/getTransactions(\?.*)?$".to_string()))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("account".into(), "EQowner".into()),
                Matcher::UrlEncoded("limit".into(), "50".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "transactions": [
                        { "hash": "abc", "utime": 1700000000, "in_msg": { "value": 5000000000u64 } }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client =
            TonApiClient::new(server.url(), "EQowner".to_string(), String::new()).unwrap();
        let txs = client.fetch_incoming(50).await.unwrap();

        mock_endpoint.assert_async().await;
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].hash.as_deref(), Some("abc"));
        assert_eq!(txs[0].value_ton(), Some(5.0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_bearer_key_sent() {
        let mut server = Server::new_async().await;

        let mock_endpoint = server
            .mock("GET", Matcher::Regex(r"^/v2/blockchain/getTransactions(\?.*)?$".to_string()))
            .match_header("authorization", "Bearer secret-key")
            .with_status(200)
            .with_body(json!({ "transactions": [] }).to_string())
            .create_async()
            .await;

        let client = TonApiClient::new(
            format!("{}/", server.url()),
            "EQowner".to_string(),
            "secret-key".to_string(),
        )
        .unwrap();
        let txs = client.fetch_incoming(50).await.unwrap();

        mock_endpoint.assert_async().await;
        assert!(txs.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_http_error_status() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", Matcher::Regex(r"^/v2/blockchain/getTransactions(\?.*)?$".to_string()))
            .with_status(500)
            .create_async()
            .await;

        let client =
            TonApiClient::new(server.url(), "EQowner".to_string(), String::new()).unwrap();
        let result = client.fetch_incoming(50).await;

        assert!(matches!(result, Err(TransactionSourceError::Status(500))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_malformed_body() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", Matcher::Regex(r"^/v2/blockchain/getTransactions(\?.*)?$".to_string()))
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client =
            TonApiClient::new(server.url(), "EQowner".to_string(), String::new()).unwrap();
        let result = client.fetch_incoming(50).await;

        assert!(matches!(result, Err(TransactionSourceError::JsonParse(_))));
    }
}
