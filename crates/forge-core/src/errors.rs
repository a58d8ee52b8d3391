//! Error types for Forge

use thiserror::Error;

/// Core errors that can occur in Forge
#[derive(Debug, Error)]
pub enum Error {
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Materialization error: {0}")]
    Materialize(#[from] MaterializeError),
}

/// Malformed input read from the external tool or supplied as text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Invalid asset string: {input:?}")]
    InvalidAsset { input: String },

    #[error("Invalid amount: {input:?}")]
    InvalidAmount { input: String },

    #[error("Invalid fund entry, expected \"<amount> <asset>\": {input:?}")]
    InvalidFund { input: String },

    #[error("Invalid tx reference, expected txId#txIx: {input:?}")]
    InvalidTxRef { input: String },

    #[error("Invalid datum descriptor: {input:?}")]
    InvalidDatum { input: String },

    #[error("Invalid UTxO line {line_no}: {line:?}")]
    InvalidUtxoLine { line_no: usize, line: String },

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Invalid transaction id: {input:?}")]
    InvalidTxId { input: String },

    #[error("Input is not valid UTF-8")]
    InvalidUtf8,
}

/// Transaction model inconsistencies detected at serialization time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Balanced transaction requires a change address")]
    MissingChangeAddress,

    #[error("Raw transaction requires execution units for {item}")]
    MissingExUnits { item: String },
}

/// Expected data is absent from otherwise valid ledger state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("No suitable collateral: no ADA-only UTxO found")]
    NoCollateral,
}

/// Side artifact (datum, redeemer, metadata) could not be created
#[derive(Debug, Error)]
#[error("Failed to materialize {kind}: {message}")]
pub struct MaterializeError {
    pub kind: String,
    pub message: String,
}

/// Result type alias for Forge operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Stable code for logs and callers that branch on error class
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Format(e) => e.error_code(),
            Self::Model(e) => e.error_code(),
            Self::Ledger(LedgerError::NoCollateral) => "no_collateral",
            Self::Materialize(_) => "materialize_failed",
        }
    }

    /// True when the input data itself is corrupt, as opposed to merely
    /// lacking a usable entry
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}

impl FormatError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAsset { .. } => "invalid_asset",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InvalidFund { .. } => "invalid_fund",
            Self::InvalidTxRef { .. } => "invalid_tx_ref",
            Self::InvalidDatum { .. } => "invalid_datum",
            Self::InvalidUtxoLine { .. } => "invalid_utxo_line",
            Self::InvalidJson { .. } => "invalid_json",
            Self::InvalidTxId { .. } => "invalid_tx_id",
            Self::InvalidUtf8 => "invalid_utf8",
        }
    }
}

impl ModelError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingChangeAddress => "missing_change_address",
            Self::MissingExUnits { .. } => "missing_ex_units",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err: Error = FormatError::InvalidAsset {
            input: "a.b.c".into(),
        }
        .into();
        assert_eq!(err.error_code(), "invalid_asset");
        assert!(err.is_format());

        let err: Error = LedgerError::NoCollateral.into();
        assert_eq!(err.error_code(), "no_collateral");
        assert!(!err.is_format());

        let err: Error = ModelError::MissingExUnits {
            item: "mint".into(),
        }
        .into();
        assert_eq!(err.error_code(), "missing_ex_units");
    }

    #[test]
    fn test_error_message_carries_input() {
        let err = FormatError::InvalidTxRef {
            input: "abc#x".into(),
        };
        assert!(err.to_string().contains("abc#x"));
    }
}
