use dotenvy::dotenv;
use thiserror::Error;
use tracing::info;

/// Default transaction API base URL
const DEFAULT_TONAPI_URL: &str = "https://tonapi.io";

/// Default ledger database
const DEFAULT_DATABASE_URL: &str = "sqlite://gammaton.db?mode=rwc";

/// Default listening port
const DEFAULT_PORT: u16 = 3000;

/// Errors raised while loading [`ServiceConfig`]
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Service configuration, read once at startup and never mutated.
#[derive(Debug, Clone)]
pub(crate) struct ServiceConfig {
    /// Wallet receiving user deposits
    owner_wallet: String,

    /// Bearer key for the transaction API; empty means public access
    tonapi_key: String,

    /// Base URL of the transaction API
    tonapi_url: String,

    /// Secret guarding the payout endpoint
    admin_secret: String,

    /// Ledger store connection string
    database_url: String,

    /// Listening port
    port: u16,

    /// Directory with the static front-end
    static_dir: String,
}

impl ServiceConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok(); // Load `.env` file if present

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let owner_wallet = required("OWNER_TON_WALLET")?;
        let admin_secret = required("ADMIN_SECRET")?;

        let tonapi_key = lookup("TONAPI_KEY").unwrap_or_default();

        let tonapi_url = lookup("TONAPI_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TONAPI_URL.to_string());

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let port = match lookup("PORT").filter(|v| !v.is_empty()) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let static_dir = lookup("STATIC_DIR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| ".".to_string());

        info!(
            %owner_wallet,
            %tonapi_url,
            authenticated = !tonapi_key.is_empty(),
            %database_url,
            port,
            %static_dir,
            "Loaded service config:"
        );

        Ok(ServiceConfig {
            owner_wallet,
            tonapi_key,
            tonapi_url,
            admin_secret,
            database_url,
            port,
            static_dir,
        })
    }

    /// Getter for `owner_wallet`
    pub fn owner_wallet(&self) -> &str {
        &self.owner_wallet
    }

    /// Getter for `tonapi_key`
    pub fn tonapi_key(&self) -> &str {
        &self.tonapi_key
    }

    /// Getter for `tonapi_url`
    pub fn tonapi_url(&self) -> &str {
        &self.tonapi_url
    }

    /// Getter for `admin_secret`
    pub fn admin_secret(&self) -> &str {
        &self.admin_secret
    }

    /// Getter for `database_url`
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Getter for `port`
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Getter for `static_dir`
    pub fn static_dir(&self) -> &str {
        &self.static_dir
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServiceConfig};
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("OWNER_TON_WALLET", "EQabc"),
            ("ADMIN_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.owner_wallet(), "EQabc");
        assert_eq!(config.admin_secret(), "s3cret");
        assert_eq!(config.tonapi_key(), "");
        assert_eq!(config.tonapi_url(), "https://tonapi.io");
        assert_eq!(config.database_url(), "sqlite://gammaton.db?mode=rwc");
        assert_eq!(config.port(), 3000);
        assert_eq!(config.static_dir(), ".");
    }

    #[test]
    fn test_missing_wallet_is_fatal() {
        let result = ServiceConfig::from_lookup(lookup_from(&[("ADMIN_SECRET", "s3cret")]));
        assert!(matches!(result, Err(ConfigError::Missing("OWNER_TON_WALLET"))));
    }

    #[test]
    fn test_empty_admin_secret_is_fatal() {
        let result = ServiceConfig::from_lookup(lookup_from(&[
            ("OWNER_TON_WALLET", "EQabc"),
            ("ADMIN_SECRET", "  "),
        ]));
        assert!(matches!(result, Err(ConfigError::Missing("ADMIN_SECRET"))));
    }

    #[test]
    fn test_invalid_port() {
        let result = ServiceConfig::from_lookup(lookup_from(&[
            ("OWNER_TON_WALLET", "EQabc"),
            ("ADMIN_SECRET", "s3cret"),
            ("PORT", "http"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "PORT", .. })));
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("OWNER_TON_WALLET", "EQabc"),
            ("ADMIN_SECRET", "s3cret"),
            ("TONAPI_KEY", "key"),
            ("TONAPI_URL", "http://localhost:9000"),
            ("PORT", "8080"),
            ("STATIC_DIR", "public"),
        ]))
        .unwrap();

        assert_eq!(config.tonapi_key(), "key");
        assert_eq!(config.tonapi_url(), "http://localhost:9000");
        assert_eq!(config.port(), 8080);
        assert_eq!(config.static_dir(), "public");
    }
}
