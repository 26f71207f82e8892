//! # Browser sync configuration: `sync.toml`
//!
//! Defines the configuration the sync reminder needs to reach the sync
//! service: the backend connection parameters handed to the sign-in manager
//! and the URL of the social sign-in window.
//!
//! ## Structure
//!
//! ```toml
//! auth_window_url = "https://auth.example.com/sign-in.html"
//!
//! [firebase_config]
//! api_key = "..."
//! database_url = "https://example.firebaseio.com"
//! messaging_sender_id = "1234"   # optional
//! ```
//!
//! ## Sources
//!
//! | Constructor | Source |
//! |-------------|--------|
//! | [`BrowserSyncConfig::from_toml`] | A `sync.toml` document ([`BrowserSyncConfig::filename`]). |
//! | [`BrowserSyncConfig::from_env`] | `SYNC_*` variables, after loading `.env` (native only). |
//!
//! Both paths finish with [`BrowserSyncConfig::validate`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Sync configuration held in the store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowserSyncConfig {
    /// Page opened in the popup for the social sign-in flow.
    #[serde(default)]
    pub auth_window_url: String,
    /// Backend connection parameters passed to the sign-in manager.
    #[serde(default)]
    pub firebase_config: DatabaseConfig,
}

/// Connection parameters for the sync database.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub database_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
}

impl BrowserSyncConfig {
    pub fn new(firebase_config: DatabaseConfig, auth_window_url: impl Into<String>) -> Self {
        Self {
            auth_window_url: auth_window_url.into(),
            firebase_config,
        }
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "sync.toml"
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Build the config from `SYNC_*` environment variables.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let auth_window_url = std::env::var("SYNC_AUTH_WINDOW_URL")
            .map_err(|_| ConfigError::MissingVar("SYNC_AUTH_WINDOW_URL"))?;
        let api_key =
            std::env::var("SYNC_API_KEY").map_err(|_| ConfigError::MissingVar("SYNC_API_KEY"))?;
        let database_url = std::env::var("SYNC_DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("SYNC_DATABASE_URL"))?;
        let messaging_sender_id = std::env::var("SYNC_MESSAGING_SENDER_ID").ok();

        let config = Self {
            auth_window_url,
            firebase_config: DatabaseConfig {
                api_key,
                database_url,
                messaging_sender_id,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// The auth window must be an http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.auth_window_url.trim();
        if url.starts_with("https://") || url.starts_with("http://") {
            Ok(())
        } else {
            Err(ConfigError::InvalidUrl(self.auth_window_url.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
auth_window_url = "https://auth.example.com/sign-in.html"

[firebase_config]
api_key = "key-123"
database_url = "https://sync-db.example.com"
"#;

    #[test]
    fn test_parse_sample() {
        let config = BrowserSyncConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.auth_window_url, "https://auth.example.com/sign-in.html");
        assert_eq!(config.firebase_config.api_key, "key-123");
        assert_eq!(config.firebase_config.database_url, "https://sync-db.example.com");
        assert!(config.firebase_config.messaging_sender_id.is_none());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = BrowserSyncConfig::from_toml(SAMPLE).unwrap();
        let text = config.to_toml().unwrap();
        assert_eq!(BrowserSyncConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_non_http_auth_window() {
        let err =
            BrowserSyncConfig::from_toml("auth_window_url = \"file:///tmp/x.html\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(url) if url == "file:///tmp/x.html"));
    }

    #[test]
    fn test_empty_document_is_invalid() {
        assert!(matches!(
            BrowserSyncConfig::from_toml(""),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            BrowserSyncConfig::from_toml("auth_window_url = "),
            Err(ConfigError::Parse(_))
        ));
    }
}
