//! cardano-tx: Transaction intent model
//!
//! Collects inputs, outputs, mints, burns and the other parts of a Cardano
//! transaction before it is rendered for the node tool.

pub mod builder;

pub use builder::{
    ExUnits, ForgeAction, MintingPolicy, OutputDatum, ScriptInput, ScriptOutput, TxBuilder,
    TxInput, TxOutput,
};
