//! cardano-ledger: Ledger value model
//!
//! Asset identities, the multi-asset value algebra with its minimum-ADA cost
//! model, and UTxOs with collateral search.

pub mod asset;
pub mod min_ada;
pub mod utxo;
pub mod value;

pub use asset::{Asset, ADA, LOVELACE};
pub use min_ada::minimum_ada;
pub use utxo::{find_collateral, find_collaterals, sum_value_of_utxos, TxRef, Utxo};
pub use value::{parse_amount, parse_fund, Value, ValueItem};
