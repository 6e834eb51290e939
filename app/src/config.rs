//! Runtime configuration for the frame server.

use std::env;

use anyhow::{bail, Context, Result};

/// Airstack GraphQL endpoint.
pub const AIRSTACK_API_URL: &str = "https://api.airstack.xyz/gql";

/// $GOLDIES token contract queried for balances.
pub const GOLDIES_TOKEN_ADDRESS: &str = "0x3150E01c36ad3Af80bA16C1836eFCD967E96776e";

/// Configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Airstack API key, sent verbatim as the Authorization header.
    pub api_key: String,

    /// Absolute base URL used to build frame button targets.
    pub public_url: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// A missing or empty `AIRSTACK_API_KEY` is an error: the server must
    /// refuse to accept traffic it can never answer.
    pub fn from_env(default_public_url: &str) -> Result<Self> {
        Self::from_vars(
            env::var("AIRSTACK_API_KEY").ok(),
            env::var("PUBLIC_URL").ok(),
            default_public_url,
        )
    }

    fn from_vars(
        api_key: Option<String>,
        public_url: Option<String>,
        default_public_url: &str,
    ) -> Result<Self> {
        let api_key = api_key.context("AIRSTACK_API_KEY is not set")?;
        if api_key.trim().is_empty() {
            bail!("AIRSTACK_API_KEY is empty");
        }

        let public_url = public_url.unwrap_or_else(|| default_public_url.to_string());

        Ok(Self {
            api_key,
            public_url: public_url.trim_end_matches('/').to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_fatal() {
        assert!(Config::from_vars(None, None, "http://localhost:3000").is_err());
        assert!(Config::from_vars(Some("  ".into()), None, "http://localhost:3000").is_err());
    }

    #[test]
    fn loads_with_api_key() {
        let config = Config::from_vars(Some("key".into()), None, "http://localhost:3000").unwrap();
        assert_eq!(config.api_key, "key");
        assert_eq!(config.public_url, "http://localhost:3000");
    }

    #[test]
    fn public_url_override_drops_trailing_slash() {
        let config = Config::from_vars(
            Some("key".into()),
            Some("https://frames.example.com/".into()),
            "http://localhost:3000",
        )
        .unwrap();
        assert_eq!(config.public_url, "https://frames.example.com");
    }
}
