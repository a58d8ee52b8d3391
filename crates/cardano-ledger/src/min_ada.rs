//! Minimum ADA a UTxO must carry
//!
//! Alonzo cost model:
//! ```text
//! valueSize  = 6 + ceil((assets * 12 + sum(distinct name bytes) + policies * 28) / 8)
//! entrySize  = 27 + valueSize + (10 if script-locked else 0)
//! minimum    = entrySize * 34482
//! ```

use std::collections::HashSet;

use forge_core::constants::{
    ASSET_ENTRY_SIZE, DATA_HASH_SIZE, NOTHING_SIZE, POLICY_ID_SIZE, UTXO_COST_PER_WORD,
    UTXO_ENTRY_SIZE_WITHOUT_VAL, VALUE_SIZE_BASE,
};
use forge_core::Lovelace;
use num_bigint::BigInt;

use crate::asset::ADA;
use crate::value::Value;

/// Minimum lovelace needed to hold `value` in a single output.
///
/// Only the shape of the non-ADA assets matters; `value` is not modified.
pub fn minimum_ada(value: &Value, is_script_utxo: bool) -> Lovelace {
    let tokens = value.assets().filter(|asset| **asset != ADA);

    let mut asset_count = 0u64;
    let mut policy_ids = HashSet::new();
    let mut token_names = HashSet::new();
    for asset in tokens {
        asset_count += 1;
        policy_ids.insert(asset.currency_symbol.as_str());
        token_names.insert(asset.token_name.as_str());
    }

    let assets_size = asset_count * ASSET_ENTRY_SIZE;
    let sum_name_length: u64 = token_names.iter().map(|name| (name.len() / 2) as u64).sum();
    let policy_size = policy_ids.len() as u64 * POLICY_ID_SIZE;

    let value_size = VALUE_SIZE_BASE + (assets_size + sum_name_length + policy_size).div_ceil(8);
    let datum_hash_size = if is_script_utxo {
        DATA_HASH_SIZE
    } else {
        NOTHING_SIZE
    };

    let entry_size = UTXO_ENTRY_SIZE_WITHOUT_VAL + value_size + datum_hash_size;
    entry_size * UTXO_COST_PER_WORD
}

impl Value {
    /// See [`minimum_ada`]
    pub fn minimum_ada(&self, is_script_utxo: bool) -> Lovelace {
        minimum_ada(self, is_script_utxo)
    }

    /// Raise the ADA entry to the minimum if it is absent or below it.
    /// A higher existing balance is kept.
    pub fn add_minimum_ada(&mut self, is_script_utxo: bool) -> &mut Self {
        let min = self.minimum_ada(is_script_utxo);
        if self.ada() < BigInt::from(min) {
            self.remove_asset(&ADA);
            self.add(ADA, min);
        }
        self
    }
}
