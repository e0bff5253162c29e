//! Wallet error types

use thiserror::Error;

use crate::provider::{ProviderError, ProviderKind};

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("A wallet connection is already in progress")]
    AlreadyConnecting,

    #[error("Already connected with {0}; disconnect before switching providers")]
    AlreadyConnected(ProviderKind),

    #[error("Failed to initialize {provider} provider: {reason}")]
    ProviderInitFailed {
        provider: ProviderKind,
        reason: String,
    },

    #[error("Login with {provider} failed: {reason}")]
    LoginFailed {
        provider: ProviderKind,
        reason: String,
    },

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Unsupported wallet provider: {0}")]
    UnsupportedProvider(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Account lookup failed: {0}")]
    Account(String),

    #[error("Storage error: {0}")]
    Storage(#[from] forge_storage::StorageError),
}
