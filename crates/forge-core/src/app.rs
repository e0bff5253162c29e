//! Application state container
//!
//! Owns the configuration, the database and the wallet session manager.
//! Hosts hold one `Forge` and hand out clones; there is no global instance.

use std::sync::Arc;
use url::Url;

use forge_storage::Database;
use forge_wallet::{
    AccountInfo, ApiAccountClient, ProviderFactory, WalletSession, WalletSessionManager,
};

use crate::config::Config;
use crate::Result;

pub struct Forge {
    config: Config,
    db: Database,
    wallet: WalletSessionManager,
}

impl Forge {
    /// Open the database and wire the wallet manager to the public API
    pub fn new(config: Config, factory: Arc<dyn ProviderFactory>) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        let accounts = ApiAccountClient::new(config.api_url.clone())?;

        Ok(Self::with_database(config, db, factory, Arc::new(accounts)))
    }

    pub fn with_database(
        config: Config,
        db: Database,
        factory: Arc<dyn ProviderFactory>,
        accounts: Arc<dyn AccountInfo>,
    ) -> Self {
        let wallet = WalletSessionManager::new(db.clone(), factory).with_account_info(accounts);

        Self { config, db, wallet }
    }

    /// Probe providers and restore the previous wallet session, once
    pub async fn start(&self) -> WalletSession {
        let supported = self.wallet.detect_supported_providers();
        tracing::info!(
            network = %self.config.network,
            providers = supported.len(),
            "SupernovaForge starting"
        );

        if self.wallet.restore_session().await.is_some() {
            tracing::info!("Previous wallet session restored");
        }

        self.wallet.session()
    }

    pub fn wallet(&self) -> &WalletSessionManager {
        &self.wallet
    }

    /// Explorer page of the connected account
    pub fn connected_account_url(&self) -> Result<Option<Url>> {
        let session = self.wallet.session();
        if !session.is_connected() {
            return Ok(None);
        }
        Ok(Some(self.config.account_url(&session.address)?))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl Clone for Forge {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            db: self.db.clone(),
            wallet: self.wallet.clone(),
        }
    }
}
