//! Airstack GraphQL client for profile and token-balance lookups.

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::{Config, AIRSTACK_API_URL, GOLDIES_TOKEN_ADDRESS};

/// Outbound request timeout. The upstream API specifies none, so the client
/// bounds every call itself.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Query failure kinds surfaced to the frame layer.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Airstack returned HTTP {0}")]
    Status(u16),

    #[error("unexpected response shape: {0}")]
    Shape(String),
}

/// Identity to look up: a Farcaster fid or a resolvable name string.
///
/// Opaque to this service beyond wire formatting; invalid identities are
/// rejected by the remote service, not validated locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Fid(u64),
    Name(String),
}

impl Identity {
    /// Parse a command-line identity: all-digit input is a fid, anything
    /// else a resolvable name.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<u64>() {
            Ok(fid) => Identity::Fid(fid),
            Err(_) => Identity::Name(raw.to_string()),
        }
    }

    /// Human-readable form for rendering inside frames.
    pub fn label(&self) -> String {
        match self {
            Identity::Fid(fid) => format!("FID {fid}"),
            Identity::Name(name) => name.clone(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Fid(fid) => write!(f, "{fid}"),
            Identity::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Normalized lookup result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub profile_name: Option<String>,
    pub profile_image: Option<String>,

    /// Balance as decimal text. `"0"` when no matching balance exists.
    pub balance: String,
}

impl UserInfo {
    /// Extract user info from a wallet record.
    ///
    /// Selection policy: the first social and the first token balance are
    /// taken as the primary records. The API orders by relevance; this is
    /// not verified further. Empty lists fall back to no profile and a zero
    /// balance rather than an error.
    pub fn from_wallet(wallet: Wallet) -> Self {
        let social = wallet.socials.unwrap_or_default().into_iter().next();
        let balance = wallet
            .token_balances
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|b| match b.formatted_amount {
                Some(amount) => Some(amount.to_string()),
                None => b.amount,
            })
            .unwrap_or_else(|| "0".to_string());

        Self {
            profile_name: social.as_ref().and_then(|s| s.profile_name.clone()),
            profile_image: social.and_then(|s| s.profile_image),
            balance,
        }
    }

    pub fn has_profile(&self) -> bool {
        self.profile_name.is_some()
    }
}

/// Source of profile/balance lookups.
///
/// Implemented by [`AirstackClient`]; handler tests substitute stubs so no
/// test touches the network.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn fetch_user_info(&self, identity: &Identity) -> Result<UserInfo, QueryError>;
}

const WALLET_QUERY: &str = r#"
query WalletChecker($identity: Identity!, $tokenAddress: Address!) {
  Wallet(input: {identity: $identity, blockchain: ethereum}) {
    socials(input: {filter: {dappName: {_eq: farcaster}}}) {
      dappName
      profileName
      profileImage
    }
    tokenBalances(
      input: {filter: {tokenAddress: {_eq: $tokenAddress}}}
    ) {
      tokenAddress
      amount
      formattedAmount
    }
  }
}
"#;

/// Airstack API client.
#[derive(Clone)]
pub struct AirstackClient {
    endpoint: String,
    api_key: String,
    http: reqwest::Client,
}

impl AirstackClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            endpoint: AIRSTACK_API_URL.to_string(),
            api_key: config.api_key.clone(),
            http,
        })
    }
}

#[async_trait]
impl BalanceSource for AirstackClient {
    /// One POST, one parse. No retries, no pagination, no multi-wallet
    /// aggregation.
    async fn fetch_user_info(&self, identity: &Identity) -> Result<UserInfo, QueryError> {
        let body = serde_json::json!({
            "query": WALLET_QUERY,
            "variables": {
                "identity": identity.to_string(),
                "tokenAddress": GOLDIES_TOKEN_ADDRESS,
            },
        });

        let resp = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(QueryError::Status(status.as_u16()));
        }

        let raw = resp.text().await?;
        debug!(identity = %identity, bytes = raw.len(), "airstack response");

        parse_user_info(&raw)
    }
}

fn parse_user_info(raw: &str) -> Result<UserInfo, QueryError> {
    let parsed: QueryResponse =
        serde_json::from_str(raw).map_err(|e| QueryError::Shape(e.to_string()))?;

    let data = parsed
        .data
        .ok_or_else(|| QueryError::Shape("missing data field".to_string()))?;

    Ok(UserInfo::from_wallet(data.wallet.unwrap_or_default()))
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "Wallet")]
    wallet: Option<Wallet>,
}

/// Wallet record as returned by the `WalletChecker` query. Both lists are
/// null when nothing matches.
#[derive(Debug, Default, Deserialize)]
pub struct Wallet {
    pub socials: Option<Vec<Social>>,
    #[serde(rename = "tokenBalances")]
    pub token_balances: Option<Vec<TokenBalance>>,
}

/// Social entry, reduced to the fields the extraction policy consumes. The
/// query also returns `dappName`; serde drops it.
#[derive(Debug, Clone, Deserialize)]
pub struct Social {
    #[serde(rename = "profileName")]
    pub profile_name: Option<String>,
    #[serde(rename = "profileImage")]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenBalance {
    pub amount: Option<String>,
    #[serde(rename = "formattedAmount")]
    pub formatted_amount: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_wallet_defaults() {
        let info = UserInfo::from_wallet(Wallet::default());
        assert_eq!(info.profile_name, None);
        assert_eq!(info.profile_image, None);
        assert_eq!(info.balance, "0");
        assert!(!info.has_profile());
    }

    #[test]
    fn first_social_and_balance_win() {
        let raw = serde_json::json!({
            "socials": [
                {"dappName": "farcaster", "profileName": "alice", "profileImage": "https://img/a.png"},
                {"dappName": "farcaster", "profileName": "bob", "profileImage": null}
            ],
            "tokenBalances": [
                {"tokenAddress": "0xabc", "amount": "42500000", "formattedAmount": 42.5},
                {"tokenAddress": "0xabc", "amount": "1", "formattedAmount": 0.000001}
            ]
        });

        let wallet: Wallet = serde_json::from_value(raw).unwrap();
        let info = UserInfo::from_wallet(wallet);
        assert_eq!(info.profile_name.as_deref(), Some("alice"));
        assert_eq!(info.profile_image.as_deref(), Some("https://img/a.png"));
        assert_eq!(info.balance, "42.5");
    }

    #[test]
    fn raw_amount_is_fallback() {
        let raw = serde_json::json!({
            "socials": null,
            "tokenBalances": [{"tokenAddress": "0xabc", "amount": "1000", "formattedAmount": null}]
        });

        let wallet: Wallet = serde_json::from_value(raw).unwrap();
        assert_eq!(UserInfo::from_wallet(wallet).balance, "1000");
    }

    #[test]
    fn parses_full_response() {
        let raw = r#"{
            "data": {
                "Wallet": {
                    "socials": [{"dappName": "farcaster", "profileName": "alice", "profileImage": null}],
                    "tokenBalances": [{"tokenAddress": "0xabc", "amount": "42500000", "formattedAmount": 42.5}]
                }
            }
        }"#;

        let info = parse_user_info(raw).unwrap();
        assert_eq!(info.profile_name.as_deref(), Some("alice"));
        assert_eq!(info.balance, "42.5");
    }

    #[test]
    fn missing_data_field_is_shape_error() {
        let err = parse_user_info(r#"{"errors": [{"message": "denied"}]}"#).unwrap_err();
        assert!(matches!(err, QueryError::Shape(_)));
    }

    #[test]
    fn null_wallet_defaults() {
        let info = parse_user_info(r#"{"data": {"Wallet": null}}"#).unwrap();
        assert_eq!(info.profile_name, None);
        assert_eq!(info.balance, "0");
    }

    #[test]
    fn identity_wire_and_label_forms() {
        let fid = Identity::Fid(12345);
        assert_eq!(fid.to_string(), "12345");
        assert_eq!(fid.label(), "FID 12345");

        let name = Identity::Name("alice.eth".to_string());
        assert_eq!(name.to_string(), "alice.eth");
        assert_eq!(name.label(), "alice.eth");
    }

    #[test]
    fn identity_parse_prefers_fid() {
        assert_eq!(Identity::parse(" 12345 "), Identity::Fid(12345));
        assert_eq!(
            Identity::parse("alice.eth"),
            Identity::Name("alice.eth".to_string())
        );
        // A fid with stray characters is a name, left for the API to reject.
        assert_eq!(
            Identity::parse("12345x"),
            Identity::Name("12345x".to_string())
        );
    }
}
