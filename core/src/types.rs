//! Domain types shared by the client and its callers.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::BitlyError;
use crate::value::Value;

/// Environment variable holding the API login.
pub const LOGIN_ENV: &str = "BITLY_LOGIN";
/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "BITLY_API_KEY";

/// Static API credentials injected into every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub login: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

impl Credentials {
    /// Both values must be non-empty.
    pub fn new(login: impl Into<String>, api_key: impl Into<String>) -> Result<Self, BitlyError> {
        let credentials = Self {
            login: login.into(),
            api_key: api_key.into(),
        };
        if credentials.login.trim().is_empty() || credentials.api_key.trim().is_empty() {
            return Err(BitlyError::Config);
        }
        Ok(credentials)
    }

    /// Read `BITLY_LOGIN` and `BITLY_API_KEY`.
    pub fn from_env() -> Result<Self, BitlyError> {
        let login = env::var(LOGIN_ENV).unwrap_or_default();
        let api_key = env::var(API_KEY_ENV).unwrap_or_default();
        Self::new(login, api_key)
    }
}

/// The result of a successful call: the service's `results` payload and the
/// HTTP status of the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalResult {
    pub result: Value,
    pub code: u16,
}

/// A link addressed either by its short URL or by its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    ShortUrl(String),
    Hash(String),
}

impl Target {
    /// Query parameter name and value for this target.
    pub fn param(&self) -> (&'static str, &str) {
        match self {
            Target::ShortUrl(url) => ("shortUrl", url),
            Target::Hash(hash) => ("hash", hash),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_require_both_values() {
        assert!(Credentials::new("testLogin", "testApiKey").is_ok());
        assert!(matches!(Credentials::new("", "testApiKey"), Err(BitlyError::Config)));
        assert!(matches!(Credentials::new("testLogin", "  "), Err(BitlyError::Config)));
    }

    #[test]
    fn credentials_deserialize_from_settings() {
        let credentials: Credentials =
            serde_json::from_str(r#"{"login":"testLogin","apiKey":"testApiKey"}"#).unwrap();
        assert_eq!(credentials.api_key, "testApiKey");
    }

    // The only test touching these variables.
    #[test]
    fn credentials_from_env() {
        env::set_var(LOGIN_ENV, "envLogin");
        env::set_var(API_KEY_ENV, "envApiKey");
        let credentials = Credentials::from_env().unwrap();
        assert_eq!(credentials.login, "envLogin");
        assert_eq!(credentials.api_key, "envApiKey");

        env::remove_var(API_KEY_ENV);
        assert!(matches!(Credentials::from_env(), Err(BitlyError::Config)));
        env::remove_var(LOGIN_ENV);
    }

    #[test]
    fn target_maps_to_switch_param() {
        assert_eq!(Target::Hash("ayQ9ef".to_string()).param(), ("hash", "ayQ9ef"));
        assert_eq!(
            Target::ShortUrl("http://bit.ly/8ZYEGc".to_string()).param(),
            ("shortUrl", "http://bit.ly/8ZYEGc")
        );
    }
}
