//! Declarative transaction builder
//!
//! A [`TxBuilder`] accumulates everything a transaction should contain and is
//! later rendered into node tool arguments. It performs no validation of its
//! own. Repeatable parts (inputs, outputs, signers) are appended; singular
//! parts (fee, change address, validity bounds, metadata) are overwritten by
//! the last call.
//!
//! Two modes:
//! 1. Balanced: a change address absorbs the remainder; the node estimates
//!    fee and execution units
//! 2. Raw: an explicit fee and per-script execution units are given

use std::fmt;

use cardano_ledger::{TxRef, Utxo, Value};
use forge_core::{Address, Lovelace, Slot};
use serde::{Deserialize, Serialize};

/// Script execution budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExUnits {
    pub cpu: u64,
    pub mem: u64,
}

impl ExUnits {
    pub fn new(cpu: u64, mem: u64) -> Self {
        Self { cpu, mem }
    }
}

/// Rendered as `(cpu,mem)`
impl fmt::Display for ExUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.cpu, self.mem)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutput {
    pub address: Address,
    pub value: Value,
}

impl TxOutput {
    pub fn new(address: impl Into<Address>, value: Value) -> Self {
        Self {
            address: address.into(),
            value,
        }
    }
}

/// An input locked by a public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxInput {
    pub tx_ref: TxRef,
    /// The spent output, kept for bookkeeping
    pub tx_out: TxOutput,
}

impl From<&Utxo> for TxInput {
    fn from(u: &Utxo) -> Self {
        Self {
            tx_ref: u.tx_ref(),
            tx_out: TxOutput::new(u.address.clone(), u.value.clone()),
        }
    }
}

/// An input locked by a Plutus validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptInput {
    pub input: TxInput,
    pub datum_hash: Option<String>,
    pub script_file: String,
    /// Datum payload (JSON), materialized as a file on serialization
    pub datum: String,
    /// Redeemer payload (JSON), materialized as a file on serialization
    pub redeemer: String,
    /// Required in raw mode only
    pub ex_units: Option<ExUnits>,
}

/// Datum attached to a script output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDatum {
    /// Precomputed datum hash
    Hash(String),
    /// Datum payload (JSON) embedded in the transaction
    Embedded(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutput {
    pub output: TxOutput,
    pub datum: OutputDatum,
}

/// Policy authorizing a mint or burn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintingPolicy {
    Plutus {
        script_file: String,
        redeemer: String,
        /// Required in raw mode only
        ex_units: Option<ExUnits>,
    },
    Native {
        script_file: String,
    },
}

impl MintingPolicy {
    pub fn script_file(&self) -> &str {
        match self {
            Self::Plutus { script_file, .. } | Self::Native { script_file } => script_file,
        }
    }
}

/// A mint or burn of `value` under `policy`. Amounts are positive in both
/// cases; burns are negated when the net forge value is computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeAction {
    pub value: Value,
    pub policy: MintingPolicy,
}

/// Accumulated transaction intent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxBuilder {
    pub pub_key_inputs: Vec<TxInput>,
    pub script_inputs: Vec<ScriptInput>,
    pub pub_key_outputs: Vec<TxOutput>,
    pub script_outputs: Vec<ScriptOutput>,
    pub minting: Vec<ForgeAction>,
    pub burning: Vec<ForgeAction>,
    pub collaterals: Vec<TxRef>,
    pub change_address: Option<Address>,
    pub fee: Option<Lovelace>,
    pub valid_range_from: Option<Slot>,
    pub valid_range_to: Option<Slot>,
    pub json_metadata: Option<String>,
    pub signer_skey_paths: Vec<String>,
    pub required_signer_vkey_hashes: Vec<String>,
}

impl TxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when an explicit positive fee has been set
    pub fn is_raw(&self) -> bool {
        self.fee.is_some_and(|fee| fee > 0)
    }

    /// Net minted-minus-burned value, without zero entries
    pub fn forge_value(&self) -> Value {
        let mut forge = Value::new();
        for mint in &self.minting {
            forge.add_all(&mint.value);
        }
        for burn in &self.burning {
            forge.add_all(&burn.value.negated());
        }
        forge.trim()
    }

    // =========================================================================
    // Inputs
    // =========================================================================

    pub fn spend_pub_key_utxos<'a>(
        &mut self,
        utxos: impl IntoIterator<Item = &'a Utxo>,
    ) -> &mut Self {
        self.pub_key_inputs.extend(utxos.into_iter().map(TxInput::from));
        self
    }

    /// Spend a script-locked UTxO; the node estimates execution units
    pub fn spend_script_utxo(
        &mut self,
        utxo: &Utxo,
        script_file: impl Into<String>,
        datum: impl Into<String>,
        redeemer: impl Into<String>,
    ) -> &mut Self {
        self.push_script_input(utxo, script_file.into(), datum.into(), redeemer.into(), None)
    }

    /// Spend a script-locked UTxO with an explicit execution budget
    pub fn spend_script_utxo_raw(
        &mut self,
        utxo: &Utxo,
        script_file: impl Into<String>,
        datum: impl Into<String>,
        redeemer: impl Into<String>,
        ex_units: ExUnits,
    ) -> &mut Self {
        self.push_script_input(
            utxo,
            script_file.into(),
            datum.into(),
            redeemer.into(),
            Some(ex_units),
        )
    }

    fn push_script_input(
        &mut self,
        utxo: &Utxo,
        script_file: String,
        datum: String,
        redeemer: String,
        ex_units: Option<ExUnits>,
    ) -> &mut Self {
        self.script_inputs.push(ScriptInput {
            input: TxInput::from(utxo),
            datum_hash: utxo.datum_hash.clone(),
            script_file,
            datum,
            redeemer,
            ex_units,
        });
        self
    }

    pub fn use_collaterals<'a>(
        &mut self,
        utxos: impl IntoIterator<Item = &'a Utxo>,
    ) -> &mut Self {
        self.collaterals.extend(utxos.into_iter().map(Utxo::tx_ref));
        self
    }

    // =========================================================================
    // Outputs
    // =========================================================================

    pub fn pay_to_pub_key(&mut self, address: impl Into<Address>, value: Value) -> &mut Self {
        self.pub_key_outputs.push(TxOutput::new(address, value));
        self
    }

    pub fn pay_to_script(
        &mut self,
        address: impl Into<Address>,
        value: Value,
        datum: OutputDatum,
    ) -> &mut Self {
        self.script_outputs.push(ScriptOutput {
            output: TxOutput::new(address, value),
            datum,
        });
        self
    }

    pub fn pay_change_to(&mut self, address: impl Into<Address>) -> &mut Self {
        self.change_address = Some(address.into());
        self
    }

    pub fn pay_fee(&mut self, fee: Lovelace) -> &mut Self {
        self.fee = Some(fee);
        self
    }

    // =========================================================================
    // Minting / burning
    // =========================================================================

    pub fn mint_assets(
        &mut self,
        value: Value,
        script_file: impl Into<String>,
        redeemer: impl Into<String>,
    ) -> &mut Self {
        self.minting
            .push(plutus_action(value, script_file.into(), redeemer.into(), None));
        self
    }

    pub fn mint_assets_raw(
        &mut self,
        value: Value,
        script_file: impl Into<String>,
        redeemer: impl Into<String>,
        ex_units: ExUnits,
    ) -> &mut Self {
        self.minting.push(plutus_action(
            value,
            script_file.into(),
            redeemer.into(),
            Some(ex_units),
        ));
        self
    }

    pub fn burn_assets(
        &mut self,
        value: Value,
        script_file: impl Into<String>,
        redeemer: impl Into<String>,
    ) -> &mut Self {
        self.burning
            .push(plutus_action(value, script_file.into(), redeemer.into(), None));
        self
    }

    pub fn burn_assets_raw(
        &mut self,
        value: Value,
        script_file: impl Into<String>,
        redeemer: impl Into<String>,
        ex_units: ExUnits,
    ) -> &mut Self {
        self.burning.push(plutus_action(
            value,
            script_file.into(),
            redeemer.into(),
            Some(ex_units),
        ));
        self
    }

    pub fn mint_native_assets(&mut self, value: Value, script_file: impl Into<String>) -> &mut Self {
        self.minting.push(native_action(value, script_file.into()));
        self
    }

    pub fn burn_native_assets(&mut self, value: Value, script_file: impl Into<String>) -> &mut Self {
        self.burning.push(native_action(value, script_file.into()));
        self
    }

    // =========================================================================
    // Validity, metadata, signers
    // =========================================================================

    /// Transaction is invalid before this slot
    pub fn set_valid_range_from(&mut self, slot: Slot) -> &mut Self {
        self.valid_range_from = Some(slot);
        self
    }

    /// Transaction is invalid from this slot on
    pub fn set_valid_range_to(&mut self, slot: Slot) -> &mut Self {
        self.valid_range_to = Some(slot);
        self
    }

    pub fn set_json_metadata(&mut self, metadata: impl Into<String>) -> &mut Self {
        self.json_metadata = Some(metadata.into());
        self
    }

    /// Require a signature from the key in this signing-key file
    pub fn add_signer_skey(&mut self, path: impl Into<String>) -> &mut Self {
        self.signer_skey_paths.push(path.into());
        self
    }

    /// Require a signature from the key with this verification-key hash
    pub fn add_required_signer_vkey_hash(&mut self, vkey_hash: impl Into<String>) -> &mut Self {
        self.required_signer_vkey_hashes.push(vkey_hash.into());
        self
    }
}

fn plutus_action(
    value: Value,
    script_file: String,
    redeemer: String,
    ex_units: Option<ExUnits>,
) -> ForgeAction {
    ForgeAction {
        value,
        policy: MintingPolicy::Plutus {
            script_file,
            redeemer,
            ex_units,
        },
    }
}

fn native_action(value: Value, script_file: String) -> ForgeAction {
    ForgeAction {
        value,
        policy: MintingPolicy::Native { script_file },
    }
}
