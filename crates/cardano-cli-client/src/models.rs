//! Models of the node tool's own outputs

use forge_core::{FormatError, Slot, TxId};
use serde::{Deserialize, Serialize};

/// Chain tip as reported by `query tip`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tip {
    pub epoch: u64,
    pub hash: String,
    pub slot: Slot,
    pub block: u64,
    pub era: String,
    /// Percentage as printed by the tool, e.g. `"100.00"`
    pub sync_progress: String,
}

impl Tip {
    pub fn from_json(raw: &[u8]) -> Result<Self, FormatError> {
        serde_json::from_slice(raw).map_err(|e| FormatError::InvalidJson {
            message: e.to_string(),
        })
    }

    pub fn is_synced(&self) -> bool {
        self.sync_progress.parse::<f64>().is_ok_and(|p| p >= 100.0)
    }
}

/// Text envelope wrapping CBOR-encoded tool artifacts (tx bodies, witnesses)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(rename = "cborHex")]
    pub cbor_hex: String,
}

impl TxEnvelope {
    pub const TX_BODY_TYPE: &'static str = "TxBodyAlonzo";
    pub const TX_WITNESS_TYPE: &'static str = "TxWitness AlonzoEra";

    pub fn tx_body(cbor_hex: impl Into<String>) -> Self {
        Self::new(Self::TX_BODY_TYPE, cbor_hex)
    }

    pub fn witness(cbor_hex: impl Into<String>) -> Self {
        Self::new(Self::TX_WITNESS_TYPE, cbor_hex)
    }

    fn new(kind: &str, cbor_hex: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            description: String::new(),
            cbor_hex: cbor_hex.into(),
        }
    }

    pub fn from_json(raw: &[u8]) -> Result<Self, FormatError> {
        let envelope: Self = serde_json::from_slice(raw).map_err(|e| FormatError::InvalidJson {
            message: e.to_string(),
        })?;
        if hex::decode(&envelope.cbor_hex).is_err() {
            return Err(FormatError::InvalidJson {
                message: format!("cborHex is not hex in {} envelope", envelope.kind),
            });
        }
        Ok(envelope)
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({
            "type": self.kind,
            "description": self.description,
            "cborHex": self.cbor_hex,
        })
        .to_string()
    }

    pub fn cbor_bytes(&self) -> Result<Vec<u8>, FormatError> {
        hex::decode(&self.cbor_hex).map_err(|_| FormatError::InvalidJson {
            message: format!("cborHex is not hex in {} envelope", self.kind),
        })
    }
}

/// A built, unsigned transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tx {
    pub tx_hash: TxId,
    /// CBOR hex of the transaction body
    pub tx_body: String,
}

impl Tx {
    /// Combine the envelope written by the build command with the output of
    /// `transaction txid`
    pub fn from_build_output(
        envelope: &TxEnvelope,
        txid_output: &str,
    ) -> Result<Self, FormatError> {
        Ok(Self {
            tx_hash: parse_tx_id(txid_output)?,
            tx_body: envelope.cbor_hex.clone(),
        })
    }

    /// Envelope for feeding the body back to `sign` or `assemble`
    pub fn body_envelope(&self) -> TxEnvelope {
        TxEnvelope::tx_body(self.tx_body.as_str())
    }
}

/// Extract the transaction id printed by `transaction txid`
pub fn parse_tx_id(output: &str) -> Result<TxId, FormatError> {
    let id = TxId::new(output.trim());
    if !id.is_well_formed() {
        return Err(FormatError::InvalidTxId {
            input: output.to_string(),
        });
    }
    Ok(id)
}
