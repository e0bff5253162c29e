//! Application configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use crate::error::CoreError;
use crate::Result;

pub const NETWORK_VAR: &str = "SUPERNOVA_NETWORK";
pub const API_URL_VAR: &str = "SUPERNOVA_API_URL";
pub const WALLETCONNECT_PROJECT_VAR: &str = "SUPERNOVA_WALLETCONNECT_PROJECT_ID";

/// MultiversX network the dashboard talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Devnet,
    Testnet,
    Mainnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }

    pub fn chain_id(&self) -> &'static str {
        match self {
            Network::Devnet => "D",
            Network::Testnet => "T",
            Network::Mainnet => "1",
        }
    }

    fn host(&self, service: &str) -> String {
        match self {
            Network::Mainnet => format!("https://{}.multiversx.com", service),
            other => format!("https://{}-{}.multiversx.com", other.as_str(), service),
        }
    }

    pub fn api_url(&self) -> String {
        self.host("api")
    }

    pub fn gateway_url(&self) -> String {
        self.host("gateway")
    }

    pub fn explorer_url(&self) -> String {
        self.host("explorer")
    }

    pub fn wallet_url(&self) -> String {
        self.host("wallet")
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "devnet" => Ok(Network::Devnet),
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            _ => Err(format!("Unknown network: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    pub network: Network,
    /// Public API used for account lookups
    pub api_url: Url,
    pub gateway_url: Url,
    /// Web wallet used by the redirect-based back-end
    pub wallet_url: Url,
    pub explorer_url: Url,
    pub chain_id: String,
    /// Relay project id for the WalletConnect back-end
    pub wallet_connect_project_id: Option<String>,
}

impl Config {
    pub fn new(data_dir: PathBuf, network: Network) -> Result<Self> {
        Ok(Self {
            database_path: data_dir.join("forge.db"),
            network,
            api_url: parse_url(&network.api_url())?,
            gateway_url: parse_url(&network.gateway_url())?,
            wallet_url: parse_url(&network.wallet_url())?,
            explorer_url: parse_url(&network.explorer_url())?,
            chain_id: network.chain_id().to_string(),
            wallet_connect_project_id: None,
        })
    }

    /// Build the configuration from `SUPERNOVA_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(Self::data_dir(), |key| std::env::var(key).ok())
    }

    fn from_lookup<F>(data_dir: PathBuf, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let network = match var(NETWORK_VAR) {
            Some(value) => value.parse::<Network>().map_err(CoreError::Config)?,
            None => Network::default(),
        };

        let mut config = Self::new(data_dir, network)?;

        if let Some(api_url) = var(API_URL_VAR) {
            config.api_url = parse_url(api_url.trim())?;
        }
        config.wallet_connect_project_id =
            var(WALLETCONNECT_PROJECT_VAR).map(|id| id.trim().to_string());

        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("SupernovaForge"))
            .unwrap_or_else(|| PathBuf::from(".supernova-forge"))
    }

    /// Explorer page for an account
    pub fn account_url(&self, address: &str) -> Result<Url> {
        self.explorer_link("accounts", address)
    }

    /// Explorer page for a transaction hash
    pub fn transaction_url(&self, hash: &str) -> Result<Url> {
        self.explorer_link("transactions", hash)
    }

    fn explorer_link(&self, section: &str, id: &str) -> Result<Url> {
        let base = self.explorer_url.as_str().trim_end_matches('/');
        parse_url(&format!("{}/{}/{}", base, section, id))
    }
}

fn parse_url(value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| CoreError::Config(format!("Invalid URL {}: {}", value, e)))
}

mod dirs {
    use std::path::PathBuf;

    fn env_path(key: &str) -> Option<PathBuf> {
        std::env::var_os(key).map(PathBuf::from)
    }

    pub fn data_local_dir() -> Option<PathBuf> {
        if cfg!(target_os = "windows") {
            env_path("LOCALAPPDATA")
        } else if cfg!(target_os = "macos") {
            env_path("HOME").map(|h| h.join("Library/Application Support"))
        } else {
            env_path("XDG_DATA_HOME").or_else(|| env_path("HOME").map(|h| h.join(".local/share")))
        }
    }
}
