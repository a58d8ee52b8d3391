//! Unspent transaction outputs and collateral search

use std::fmt;

use forge_core::{Address, LedgerError, TxId};
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// An unspent output as reported by the node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    #[serde(rename = "txID")]
    pub tx_id: TxId,
    #[serde(rename = "txIndex")]
    pub tx_index: u32,
    /// Empty when the query did not filter by address
    pub address: Address,
    pub value: Value,
    #[serde(rename = "datumHash")]
    pub datum_hash: Option<String>,
}

impl Utxo {
    pub fn new(tx_id: impl Into<TxId>, tx_index: u32, address: Address, value: Value) -> Self {
        Self {
            tx_id: tx_id.into(),
            tx_index,
            address,
            value,
            datum_hash: None,
        }
    }

    pub fn with_datum_hash(mut self, datum_hash: impl Into<String>) -> Self {
        self.datum_hash = Some(datum_hash.into());
        self
    }

    pub fn tx_ref(&self) -> TxRef {
        TxRef::new(self.tx_id.clone(), self.tx_index)
    }
}

/// Reference to an output: `txId#txIndex`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxRef {
    pub tx_id: TxId,
    pub tx_index: u32,
}

impl TxRef {
    pub fn new(tx_id: impl Into<TxId>, tx_index: u32) -> Self {
        Self {
            tx_id: tx_id.into(),
            tx_index,
        }
    }
}

impl fmt::Display for TxRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.tx_id, self.tx_index)
    }
}

// =============================================================================
// Collateral
// =============================================================================

/// The largest ADA-only UTxO, suitable as collateral. Ties go to the
/// earliest entry.
pub fn find_collateral(utxos: &[Utxo]) -> Result<&Utxo, LedgerError> {
    utxos
        .iter()
        .rev()
        .filter(|u| u.value.is_ada_only())
        .max_by(|a, b| a.value.ada().cmp(&b.value.ada()))
        .ok_or(LedgerError::NoCollateral)
}

/// All ADA-only UTxOs, in input order
pub fn find_collaterals(utxos: &[Utxo]) -> Vec<&Utxo> {
    utxos.iter().filter(|u| u.value.is_ada_only()).collect()
}

/// Total value held by a set of UTxOs
pub fn sum_value_of_utxos(utxos: &[Utxo]) -> Value {
    let mut total = Value::new();
    for utxo in utxos {
        total.add_all(&utxo.value);
    }
    total
}
