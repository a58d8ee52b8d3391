//! Asset identity
//!
//! An asset is a `(currency symbol, token name)` pair. The empty pair is ADA.
//! The string form used by the node tool is `lovelace` for ADA,
//! `{symbol}` for a token with an empty name and `{symbol}.{name}` otherwise.
//!
//! The string form is not injective: an asset whose symbol is literally
//! `lovelace` with an empty name renders as `lovelace` and parses back as
//! [`ADA`]. Policy ids are 56 hex digits, so no on-chain asset hits this.

use std::fmt;
use std::str::FromStr;

use forge_core::FormatError;
use serde::{Deserialize, Serialize};

/// String form of the native asset
pub const LOVELACE: &str = "lovelace";

/// The chain's native currency
pub const ADA: Asset = Asset {
    currency_symbol: String::new(),
    token_name: String::new(),
};

/// A currency/token identity. Ordering is by currency symbol, then token name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub currency_symbol: String,
    pub token_name: String,
}

impl Asset {
    pub fn new(currency_symbol: impl Into<String>, token_name: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
            token_name: token_name.into(),
        }
    }

    pub fn is_ada(&self) -> bool {
        self.currency_symbol.is_empty() && self.token_name.is_empty()
    }

    /// Token name length in bytes (the name is hex-encoded on the wire)
    pub fn token_name_len(&self) -> usize {
        self.token_name.len() / 2
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ada() {
            write!(f, "{}", LOVELACE)
        } else if self.token_name.is_empty() {
            write!(f, "{}", self.currency_symbol)
        } else {
            write!(f, "{}.{}", self.currency_symbol, self.token_name)
        }
    }
}

/// `lovelace` always reads as [`ADA`], even when rendered from an asset
/// whose symbol is `lovelace` and whose name is empty.
impl FromStr for Asset {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == LOVELACE {
            return Ok(ADA);
        }
        let invalid = || FormatError::InvalidAsset {
            input: s.to_string(),
        };
        if s.is_empty() {
            return Err(invalid());
        }
        let parts: Vec<&str> = s.split('.').collect();
        match parts.as_slice() {
            [symbol] => Ok(Asset::new(*symbol, "")),
            [symbol, name] => Ok(Asset::new(*symbol, *name)),
            _ => Err(invalid()),
        }
    }
}
