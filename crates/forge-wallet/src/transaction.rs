//! MultiversX transaction handed to wallet back-ends for signing

use serde::{Deserialize, Serialize};

/// Transaction version introduced with the Supernova upgrade
pub const DEFAULT_TX_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub nonce: u64,
    /// Amount in the smallest denomination, as a decimal string
    pub value: String,
    pub receiver: String,
    pub sender: String,
    pub gas_price: u64,
    pub gas_limit: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian_signature: Option<String>,
}

impl Transaction {
    pub fn new(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        value: impl Into<String>,
        nonce: u64,
        chain_id: impl Into<String>,
    ) -> Self {
        Self {
            nonce,
            value: value.into(),
            receiver: receiver.into(),
            sender: sender.into(),
            gas_price: 1_000_000_000,
            gas_limit: 50_000,
            data: None,
            chain_id: chain_id.into(),
            version: DEFAULT_TX_VERSION,
            options: None,
            guardian: None,
            signature: None,
            guardian_signature: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn is_signed(&self) -> bool {
        self.signature.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// True if `other` is the same transaction, ignoring signatures.
    pub fn corresponds_to(&self, other: &Transaction) -> bool {
        self.nonce == other.nonce
            && self.sender == other.sender
            && self.receiver == other.receiver
            && self.value == other.value
            && self.data == other.data
            && self.chain_id == other.chain_id
    }
}
