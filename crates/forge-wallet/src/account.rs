//! Account-info collaborator
//!
//! Balance lookups go through [`AccountInfo`] so the manager never depends on
//! a particular network client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::error::WalletError;
use crate::format::{format_balance, NATIVE_DECIMALS, NATIVE_TICKER};
use crate::Result;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const BALANCE_PRECISION: usize = 4;

#[async_trait]
pub trait AccountInfo: Send + Sync {
    /// Display-ready native balance for `address`
    async fn get_balance(&self, address: &str) -> Result<String>;
}

/// Response body of `GET /accounts/{address}` (fields we use)
#[derive(Debug, Deserialize)]
struct AccountResponse {
    #[serde(default)]
    balance: Option<String>,
}

/// Client for the MultiversX public API
pub struct ApiAccountClient {
    client: Client,
    api_url: Url,
}

impl ApiAccountClient {
    pub fn new(api_url: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WalletError::Account(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, api_url })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn account_url(&self, address: &str) -> Result<Url> {
        let base = self.api_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{}/accounts/{}", base, address))
            .map_err(|e| WalletError::Account(format!("Invalid account URL: {}", e)))
    }
}

#[async_trait]
impl AccountInfo for ApiAccountClient {
    async fn get_balance(&self, address: &str) -> Result<String> {
        let url = self.account_url(address)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WalletError::Account(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WalletError::Account(format!("HTTP error! status: {}", status)));
        }

        let body: AccountResponse = response
            .json()
            .await
            .map_err(|e| WalletError::Account(format!("Malformed account response: {}", e)))?;

        display_balance(body.balance.as_deref().unwrap_or("0"))
    }
}

fn display_balance(raw: &str) -> Result<String> {
    let amount = format_balance(raw, NATIVE_DECIMALS, BALANCE_PRECISION)
        .ok_or_else(|| WalletError::Account(format!("Invalid balance value: {}", raw)))?;
    Ok(format!("{} {}", amount, NATIVE_TICKER))
}
