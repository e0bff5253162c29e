//! Provider selection
//!
//! The host registers one constructor per wallet kind and describes what its
//! runtime offers; the manager asks the factory which kinds are usable and
//! builds a fresh back-end on every connect.

use std::collections::{HashMap, HashSet};

use crate::provider::{ProviderError, ProviderKind, WalletBackend};

/// Global object injected by the MultiversX browser extension
pub const EXTENSION_GLOBAL: &str = "elrondWallet";

pub trait ProviderFactory: Send + Sync {
    fn create(&self, kind: ProviderKind) -> Result<Box<dyn WalletBackend>, ProviderError>;

    /// Fast capability probe. Must not block.
    fn is_available(&self, kind: ProviderKind) -> bool;
}

/// What the host runtime exposes to wallet back-ends
#[derive(Debug, Clone, Default)]
pub struct RuntimeEnvironment {
    /// Names of objects injected into the page by browser agents
    pub injected_globals: HashSet<String>,
    /// Whether a USB/HID transport for hardware wallets is present
    pub hardware_transport: bool,
}

impl RuntimeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global(mut self, name: impl Into<String>) -> Self {
        self.injected_globals.insert(name.into());
        self
    }

    pub fn with_hardware_transport(mut self, present: bool) -> Self {
        self.hardware_transport = present;
        self
    }

    pub fn has_global(&self, name: &str) -> bool {
        self.injected_globals.contains(name)
    }

    /// Whether the runtime can host a back-end of this kind
    pub fn supports(&self, kind: ProviderKind) -> bool {
        match kind {
            kind if kind.is_network_based() => true,
            ProviderKind::BrowserExtension => self.has_global(EXTENSION_GLOBAL),
            ProviderKind::Hardware => self.hardware_transport,
            _ => false,
        }
    }
}

type Constructor = Box<dyn Fn() -> Box<dyn WalletBackend> + Send + Sync>;

/// Standard [`ProviderFactory`]: one registered constructor per kind
pub struct ProviderRegistry {
    environment: RuntimeEnvironment,
    constructors: HashMap<ProviderKind, Constructor>,
}

impl ProviderRegistry {
    pub fn new(environment: RuntimeEnvironment) -> Self {
        Self {
            environment,
            constructors: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, kind: ProviderKind, constructor: F)
    where
        F: Fn() -> Box<dyn WalletBackend> + Send + Sync + 'static,
    {
        if self
            .constructors
            .insert(kind, Box::new(constructor))
            .is_some()
        {
            tracing::debug!(provider = %kind, "Replaced wallet back-end constructor");
        }
    }

    pub fn with<F>(mut self, kind: ProviderKind, constructor: F) -> Self
    where
        F: Fn() -> Box<dyn WalletBackend> + Send + Sync + 'static,
    {
        self.register(kind, constructor);
        self
    }

    pub fn environment(&self) -> &RuntimeEnvironment {
        &self.environment
    }

    pub fn registered_kinds(&self) -> Vec<ProviderKind> {
        let mut kinds: Vec<ProviderKind> = self.constructors.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

impl ProviderFactory for ProviderRegistry {
    fn create(&self, kind: ProviderKind) -> Result<Box<dyn WalletBackend>, ProviderError> {
        let constructor = self.constructors.get(&kind).ok_or_else(|| {
            ProviderError::Unavailable(format!("no {} back-end registered", kind))
        })?;

        let backend = constructor();
        if backend.kind() != kind {
            return Err(ProviderError::Other(format!(
                "constructor for {} built a {} back-end",
                kind,
                backend.kind()
            )));
        }

        Ok(backend)
    }

    fn is_available(&self, kind: ProviderKind) -> bool {
        self.constructors.contains_key(&kind) && self.environment.supports(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Transaction;
    use async_trait::async_trait;

    struct NullBackend(ProviderKind);

    #[async_trait]
    impl WalletBackend for NullBackend {
        fn kind(&self) -> ProviderKind {
            self.0
        }

        async fn initialize(&mut self) -> Result<bool, ProviderError> {
            Ok(true)
        }

        async fn login(&mut self) -> Result<String, ProviderError> {
            Ok("erd1null".to_string())
        }

        async fn logout(&mut self) -> Result<bool, ProviderError> {
            Ok(true)
        }

        async fn sign_transactions(
            &self,
            transactions: Vec<Transaction>,
        ) -> Result<Vec<Transaction>, ProviderError> {
            Ok(transactions)
        }

        async fn sign_message(&self, _message: &[u8]) -> Result<String, ProviderError> {
            Ok(String::new())
        }

        fn is_initialized(&self) -> bool {
            true
        }

        fn is_connected(&self) -> bool {
            false
        }

        fn address(&self) -> Option<String> {
            None
        }
    }

    fn full_registry(environment: RuntimeEnvironment) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new(environment);
        for kind in ProviderKind::ALL {
            registry.register(kind, move || Box::new(NullBackend(kind)));
        }
        registry
    }

    #[test]
    fn test_environment_probe() {
        let bare = full_registry(RuntimeEnvironment::new());
        assert!(!bare.is_available(ProviderKind::BrowserExtension));
        assert!(bare.is_available(ProviderKind::WalletConnect));
        assert!(bare.is_available(ProviderKind::WebWallet));
        assert!(!bare.is_available(ProviderKind::Hardware));

        let equipped = full_registry(
            RuntimeEnvironment::new()
                .with_global(EXTENSION_GLOBAL)
                .with_hardware_transport(true),
        );
        for kind in ProviderKind::ALL {
            assert!(equipped.is_available(kind));
        }
    }

    #[test]
    fn test_unregistered_kind_is_unavailable() {
        let registry = ProviderRegistry::new(RuntimeEnvironment::new())
            .with(ProviderKind::WebWallet, || {
                Box::new(NullBackend(ProviderKind::WebWallet))
            });

        assert!(!registry.is_available(ProviderKind::WalletConnect));
        assert!(matches!(
            registry.create(ProviderKind::WalletConnect),
            Err(ProviderError::Unavailable(_))
        ));
        assert_eq!(registry.registered_kinds(), vec![ProviderKind::WebWallet]);
    }

    #[test]
    fn test_constructor_kind_mismatch() {
        let registry = ProviderRegistry::new(RuntimeEnvironment::new())
            .with(ProviderKind::WebWallet, || {
                Box::new(NullBackend(ProviderKind::Hardware))
            });

        assert!(matches!(
            registry.create(ProviderKind::WebWallet),
            Err(ProviderError::Other(_))
        ));
    }
}
