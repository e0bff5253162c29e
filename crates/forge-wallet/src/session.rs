//! Wallet session data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::WalletError;
use crate::format::format_address;
use crate::provider::ProviderKind;
use crate::state::ConnectionStatus;
use crate::Result;

/// Balance shown before the first successful refresh
const EMPTY_BALANCE: &str = "0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSession {
    /// Current state in the connection state machine
    pub status: ConnectionStatus,
    /// Account address; empty unless connected
    pub address: String,
    /// Display-formatted native balance
    pub balance: String,
    /// Back-end kind in use
    pub provider: Option<ProviderKind>,
    /// Last failure to show the user
    pub last_error: Option<String>,
    /// Kinds usable in this runtime, fixed after the startup probe
    pub supported_providers: Vec<ProviderKind>,
    /// Identifies one connect..disconnect span
    pub connection_id: Option<String>,
    pub connected_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl WalletSession {
    pub fn new() -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            address: String::new(),
            balance: EMPTY_BALANCE.to_string(),
            provider: None,
            last_error: None,
            supported_providers: Vec::new(),
            connection_id: None,
            connected_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Attempt to transition to a new state
    pub fn transition_to(&mut self, new_status: ConnectionStatus) -> Result<()> {
        if !self.status.can_transition_to(new_status) {
            return Err(WalletError::InvalidTransition {
                from: self.status.to_string(),
                to: new_status.to_string(),
            });
        }

        tracing::debug!(
            from = %self.status,
            to = %new_status,
            "Wallet state transition"
        );

        self.status = new_status;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Enter Connecting, forgetting any previous failure
    pub fn begin_connect(&mut self, provider: ProviderKind) -> Result<()> {
        self.transition_to(ConnectionStatus::Connecting)?;
        self.provider = Some(provider);
        self.last_error = None;
        Ok(())
    }

    /// Record a completed login. Returns the new connection id.
    pub fn mark_connected(&mut self, provider: ProviderKind, address: String) -> Result<String> {
        if address.trim().is_empty() {
            return Err(WalletError::LoginFailed {
                provider,
                reason: "no address returned".to_string(),
            });
        }

        self.transition_to(ConnectionStatus::Connected)?;

        let connection_id = Uuid::new_v4().to_string();
        self.address = address;
        self.provider = Some(provider);
        self.balance = EMPTY_BALANCE.to_string();
        self.last_error = None;
        self.connection_id = Some(connection_id.clone());
        self.connected_at = Some(self.updated_at);

        Ok(connection_id)
    }

    /// Record a failed connect attempt
    pub fn mark_failed(&mut self, message: String) -> Result<()> {
        self.transition_to(ConnectionStatus::Error)?;
        self.clear_connection();
        self.last_error = Some(message);
        Ok(())
    }

    /// Return to the empty Disconnected state. Always succeeds.
    pub fn reset(&mut self) {
        if self.status != ConnectionStatus::Disconnected {
            tracing::debug!(from = %self.status, to = "disconnected", "Wallet state reset");
        }
        self.status = ConnectionStatus::Disconnected;
        self.clear_connection();
        self.last_error = None;
        self.updated_at = Utc::now();
    }

    /// Drop the recorded error; a failed session falls back to Disconnected
    pub fn clear_error(&mut self) {
        if self.status == ConnectionStatus::Error {
            self.reset();
        } else if self.last_error.take().is_some() {
            self.updated_at = Utc::now();
        }
    }

    pub fn set_error(&mut self, message: String) {
        self.last_error = Some(message);
        self.updated_at = Utc::now();
    }

    pub fn set_balance(&mut self, balance: String) {
        self.balance = balance;
        self.updated_at = Utc::now();
    }

    pub fn is_connected(&self) -> bool {
        self.status.is_connected()
    }

    pub fn is_connecting(&self) -> bool {
        self.status.is_connecting()
    }

    /// Shortened address for headers and buttons
    pub fn short_address(&self) -> String {
        format_address(&self.address, 6)
    }

    fn clear_connection(&mut self) {
        self.address.clear();
        self.balance = EMPTY_BALANCE.to_string();
        self.provider = None;
        self.connection_id = None;
        self.connected_at = None;
    }
}

impl Default for WalletSession {
    fn default() -> Self {
        Self::new()
    }
}
