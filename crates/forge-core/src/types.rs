//! Core type definitions for Forge

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction ID (32 bytes, hex-encoded)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(pub String);

impl TxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check that the id is exactly 32 bytes of hex
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == constants::TX_ID_HEX_LEN && hex::decode(&self.0).is_ok()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TxId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Bech32 Cardano address (payment or script)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if this is a testnet address
    pub fn is_testnet(&self) -> bool {
        self.0.starts_with("addr_test")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Ledger era the build command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Era {
    Alonzo,
    Babbage,
}

impl Era {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alonzo => "alonzo",
            Self::Babbage => "babbage",
        }
    }

    /// Command-line flag selecting this era
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Alonzo => "--alonzo-era",
            Self::Babbage => "--babbage-era",
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Network the node tool talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    /// Testnet identified by its network magic
    Testnet(u32),
}

impl Network {
    pub const MAINNET_MAGIC: u32 = 764_824_073;
    pub const LEGACY_TESTNET_MAGIC: u32 = 1_097_911_063;
    pub const PREPROD_MAGIC: u32 = 1;
    pub const PREVIEW_MAGIC: u32 = 2;

    pub fn preprod() -> Self {
        Self::Testnet(Self::PREPROD_MAGIC)
    }

    pub fn preview() -> Self {
        Self::Testnet(Self::PREVIEW_MAGIC)
    }

    pub fn magic(&self) -> u32 {
        match self {
            Self::Mainnet => Self::MAINNET_MAGIC,
            Self::Testnet(magic) => *magic,
        }
    }

    /// `--mainnet` or `--testnet-magic <magic>`
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Mainnet => vec!["--mainnet".to_string()],
            Self::Testnet(magic) => vec!["--testnet-magic".to_string(), magic.to_string()],
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::preprod()
    }
}

/// Absolute slot number
pub type Slot = u64;

/// Lovelace amount (1 ADA = 1_000_000 lovelace)
pub type Lovelace = u64;

/// Constants
pub mod constants {
    use super::Lovelace;

    /// 1 ADA in lovelace
    pub const LOVELACE_PER_ADA: Lovelace = 1_000_000;

    /// Hex length of a transaction id or datum hash
    pub const TX_ID_HEX_LEN: usize = 64;
    pub const DATUM_HASH_HEX_LEN: usize = 64;

    // Alonzo-era minimum UTxO cost model. These must match the ledger exactly.
    pub const UTXO_ENTRY_SIZE_WITHOUT_VAL: u64 = 27;
    pub const UTXO_COST_PER_WORD: Lovelace = 34_482;
    pub const DATA_HASH_SIZE: u64 = 10;
    pub const NOTHING_SIZE: u64 = 0;
    pub const POLICY_ID_SIZE: u64 = 28;
    pub const ASSET_ENTRY_SIZE: u64 = 12;
    pub const VALUE_SIZE_BASE: u64 = 6;
}
