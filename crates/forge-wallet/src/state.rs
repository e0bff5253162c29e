//! Connection State Machine
//!
//! ```text
//! Disconnected ──connect──▶ Connecting ──login ok──▶ Connected
//!      ▲                      │    │                    │
//!      │              restore │    │ init/login failed  │
//!      │            abandoned │    ▼                    │
//!      ├──────────────────────┘  Error ──connect──▶ Connecting
//!      │                           │
//!      └───────disconnect──────────┴────────────────────┘
//! ```
//!
//! Switching providers always goes through Disconnected.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// No back-end active
    #[default]
    Disconnected,
    /// A connect is in flight
    Connecting,
    /// A back-end is active and logged in
    Connected,
    /// The last connect attempt failed
    Error,
}

impl ConnectionStatus {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: ConnectionStatus) -> bool {
        use ConnectionStatus::*;

        match (self, target) {
            (Disconnected, Connecting) => true,
            (Connecting, Connected) => true,
            (Connecting, Error) => true,
            // Silent startup restore gives up without surfacing an error
            (Connecting, Disconnected) => true,
            (Connected, Disconnected) => true,
            (Error, Connecting) => true,
            (Error, Disconnected) => true,
            // Disconnect is always allowed, even when there is nothing to tear down
            (Disconnected, Disconnected) => true,
            _ => false,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectionStatus::Connecting)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConnectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disconnected" => Ok(ConnectionStatus::Disconnected),
            "connecting" => Ok(ConnectionStatus::Connecting),
            "connected" => Ok(ConnectionStatus::Connected),
            "error" => Ok(ConnectionStatus::Error),
            _ => Err(format!("Unknown connection status: {}", s)),
        }
    }
}
