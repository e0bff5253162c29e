//! SupernovaForge Wallet Sessions
//!
//! Single source of truth for wallet connectivity:
//! - One active wallet back-end at a time, selected per connect
//! - Connection state machine (Disconnected / Connecting / Connected / Error)
//! - Provider and address mirrored to durable storage for auto-restore
//! - Best-effort balance refresh through an account-info collaborator

mod account;
mod error;
mod format;
mod manager;
mod provider;
mod registry;
mod session;
mod state;
mod store;
mod transaction;

pub use account::{AccountInfo, ApiAccountClient};
pub use error::WalletError;
pub use format::{format_address, format_balance, NATIVE_DECIMALS, NATIVE_TICKER};
pub use manager::WalletSessionManager;
pub use provider::{ProviderError, ProviderKind, WalletBackend};
pub use registry::{ProviderFactory, ProviderRegistry, RuntimeEnvironment, EXTENSION_GLOBAL};
pub use session::WalletSession;
pub use state::ConnectionStatus;
pub use store::{PersistedSession, SessionStore, ADDRESS_KEY, PROVIDER_KEY};
pub use transaction::Transaction;

pub type Result<T> = std::result::Result<T, WalletError>;
