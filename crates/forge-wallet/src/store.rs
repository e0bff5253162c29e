//! Durable mirror of the connected wallet
//!
//! Only the provider kind and address survive a restart. Both keys are
//! written and removed together.

use forge_storage::Database;

use crate::error::WalletError;
use crate::provider::ProviderKind;
use crate::Result;

pub const PROVIDER_KEY: &str = "walletProvider";
pub const ADDRESS_KEY: &str = "walletAddress";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSession {
    pub provider: ProviderKind,
    pub address: String,
}

#[derive(Clone)]
pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn save(&self, provider: ProviderKind, address: &str) -> Result<()> {
        self.db
            .set_settings(&[(PROVIDER_KEY, provider.as_str()), (ADDRESS_KEY, address)])?;
        Ok(())
    }

    /// Read the persisted pair.
    ///
    /// `Ok(None)` when either key is missing or blank. An unrecognised
    /// provider string is an error so the caller can purge it.
    pub fn load(&self) -> Result<Option<PersistedSession>> {
        let provider = self.db.get_setting(PROVIDER_KEY)?;
        let address = self.db.get_setting(ADDRESS_KEY)?;

        let (provider, address) = match (provider, address) {
            (Some(p), Some(a)) if !p.trim().is_empty() && !a.trim().is_empty() => (p, a),
            _ => return Ok(None),
        };

        let provider = provider
            .parse::<ProviderKind>()
            .map_err(|_| WalletError::UnsupportedProvider(provider))?;

        Ok(Some(PersistedSession { provider, address }))
    }

    /// True if either key is present, even when `load` finds no usable pair
    pub fn has_leftovers(&self) -> Result<bool> {
        Ok(self.db.get_setting(PROVIDER_KEY)?.is_some()
            || self.db.get_setting(ADDRESS_KEY)?.is_some())
    }

    pub fn clear(&self) -> Result<()> {
        self.db.remove_settings(&[PROVIDER_KEY, ADDRESS_KEY])?;
        Ok(())
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_clear() {
        let store = SessionStore::new(Database::open_in_memory().unwrap());
        assert_eq!(store.load().unwrap(), None);

        store
            .save(ProviderKind::BrowserExtension, "erd1mock123")
            .unwrap();
        assert_eq!(
            store.database().get_setting(PROVIDER_KEY).unwrap().as_deref(),
            Some("extension")
        );
        assert_eq!(
            store.load().unwrap(),
            Some(PersistedSession {
                provider: ProviderKind::BrowserExtension,
                address: "erd1mock123".to_string(),
            })
        );

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.database().get_setting(ADDRESS_KEY).unwrap(), None);
    }

    #[test]
    fn test_half_written_pair_is_ignored() {
        let db = Database::open_in_memory().unwrap();
        db.set_setting(PROVIDER_KEY, "web-wallet").unwrap();

        let store = SessionStore::new(db);
        assert_eq!(store.load().unwrap(), None);
        assert!(store.has_leftovers().unwrap());

        store.clear().unwrap();
        assert!(!store.has_leftovers().unwrap());
    }

    #[test]
    fn test_unknown_provider_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        db.set_settings(&[(PROVIDER_KEY, "metamask"), (ADDRESS_KEY, "0xabc")])
            .unwrap();

        let store = SessionStore::new(db);
        assert!(matches!(
            store.load(),
            Err(WalletError::UnsupportedProvider(p)) if p == "metamask"
        ));
    }
}
