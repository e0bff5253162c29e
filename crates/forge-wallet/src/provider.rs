//! Wallet back-end capability set
//!
//! Every supported wallet (browser extension, WalletConnect relay, hosted web
//! wallet, hardware device) is driven through [`WalletBackend`]. The manager
//! never looks past this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transaction::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "extension")]
    BrowserExtension,
    #[serde(rename = "wallet-connect", alias = "xportal")]
    WalletConnect,
    #[serde(rename = "web-wallet")]
    WebWallet,
    #[serde(rename = "ledger")]
    Hardware,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::BrowserExtension,
        ProviderKind::WalletConnect,
        ProviderKind::WebWallet,
        ProviderKind::Hardware,
    ];

    /// Identifier used in durable storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::BrowserExtension => "extension",
            ProviderKind::WalletConnect => "wallet-connect",
            ProviderKind::WebWallet => "web-wallet",
            ProviderKind::Hardware => "ledger",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::BrowserExtension => "MultiversX DeFi Wallet",
            ProviderKind::WalletConnect => "xPortal App",
            ProviderKind::WebWallet => "Web Wallet",
            ProviderKind::Hardware => "Ledger",
        }
    }

    /// Network-based providers need nothing from the local runtime
    pub fn is_network_based(&self) -> bool {
        matches!(self, ProviderKind::WalletConnect | ProviderKind::WebWallet)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "extension" => Ok(ProviderKind::BrowserExtension),
            "wallet-connect" | "xportal" => Ok(ProviderKind::WalletConnect),
            "web-wallet" => Ok(ProviderKind::WebWallet),
            "ledger" => Ok(ProviderKind::Hardware),
            _ => Err(format!("Unknown wallet provider: {}", s)),
        }
    }
}

/// Failure reported by a wallet back-end
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider not initialized")]
    NotInitialized,

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider timed out")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait WalletBackend: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Prepare the back-end. Calling it twice must be harmless.
    async fn initialize(&mut self) -> Result<bool, ProviderError>;

    /// Run the user-facing connection flow and return the account address.
    async fn login(&mut self) -> Result<String, ProviderError>;

    async fn logout(&mut self) -> Result<bool, ProviderError>;

    /// Sign every transaction, returning them in the same order.
    async fn sign_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, ProviderError>;

    async fn sign_message(&self, message: &[u8]) -> Result<String, ProviderError>;

    fn is_initialized(&self) -> bool;

    fn is_connected(&self) -> bool;

    fn address(&self) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_identifiers() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>(), Ok(kind));
        }
        assert_eq!(
            "xportal".parse::<ProviderKind>(),
            Ok(ProviderKind::WalletConnect)
        );
        assert!("metamask".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_serde_matches_storage_identifier() {
        let json = serde_json::to_string(&ProviderKind::Hardware).unwrap();
        assert_eq!(json, "\"ledger\"");

        let kind: ProviderKind = serde_json::from_str("\"xportal\"").unwrap();
        assert_eq!(kind, ProviderKind::WalletConnect);
    }
}
