//! cardano-cli-client: Protocol layer for the cardano-cli node tool
//!
//! Renders a [`cardano_tx::TxBuilder`] into `transaction build` arguments,
//! assembles the argument lists of the surrounding query and submit
//! commands, and parses what the tool prints back: UTxO query responses in
//! both the legacy table and the JSON layout, the chain tip, transaction
//! envelopes and transaction ids. Running the tool is left to the caller.

pub mod args;
pub mod materialize;
pub mod models;
pub mod parser;
pub mod queries;

pub use args::{build_ex_units, build_input, build_output, build_tx_args, build_value};
pub use materialize::{Artifact, Materializer, MemoryMaterializer};
pub use models::{parse_tx_id, Tip, Tx, TxEnvelope};
pub use parser::{
    parse_datum_hash, parse_legacy_utxo_table, parse_tx_ref, parse_utxo_json, parse_utxo_response,
    UtxoFormat,
};
pub use queries::format_cli_args;

/// Result type for serializer and parser operations
pub type Result<T> = std::result::Result<T, forge_core::Error>;
