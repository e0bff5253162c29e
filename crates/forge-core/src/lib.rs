//! SupernovaForge Core
//!
//! Application-level wiring: configuration, storage, and the wallet session
//! manager owned by one explicit container.

mod app;
mod config;
mod error;

pub use app::Forge;
pub use config::{Config, Network};
pub use error::CoreError;

// Re-export the crates a host needs to drive a session
pub use forge_storage::{Database, StorageError};
pub use forge_wallet::{
    AccountInfo, ApiAccountClient, ConnectionStatus, ProviderError, ProviderFactory,
    ProviderKind, ProviderRegistry, RuntimeEnvironment, Transaction, WalletBackend, WalletError,
    WalletSession, WalletSessionManager,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
