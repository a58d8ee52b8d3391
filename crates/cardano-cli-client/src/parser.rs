//! UTxO query response parsing
//!
//! The node tool reports UTxOs in one of two layouts, parsed by independent
//! functions:
//! - [`parse_legacy_utxo_table`]: the whitespace table printed by older
//!   releases (two header lines, then `txId txIx <value> + <datum>`)
//! - [`parse_utxo_json`]: the JSON object keyed by `txId#txIx`
//!
//! Any malformed entry aborts the whole parse.

use std::collections::BTreeMap;

use cardano_ledger::{parse_amount, parse_fund, Asset, TxRef, Utxo, Value, ADA, LOVELACE};
use forge_core::constants::DATUM_HASH_HEX_LEN;
use forge_core::{Address, FormatError};
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::Result;

/// Layout of a UTxO query response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtxoFormat {
    LegacyText,
    Json,
}

/// Header lines preceding the legacy table rows
const LEGACY_HEADER_LINES: usize = 2;

const DATUM_HASH_NONE: &str = "TxOutDatumHashNone";
const DATUM_NONE: &str = "TxOutDatumNone";
const DATUM_HASH_PREFIX: &str = "TxOutDatumHash ";

/// Parse a raw query response. `address` is the address the query was
/// filtered by, if any.
pub fn parse_utxo_response(
    format: UtxoFormat,
    raw: &[u8],
    address: Option<&str>,
) -> Result<Vec<Utxo>> {
    let utxos = match format {
        UtxoFormat::LegacyText => {
            let text = std::str::from_utf8(raw).map_err(|_| FormatError::InvalidUtf8)?;
            parse_legacy_utxo_table(text, address)?
        }
        UtxoFormat::Json => parse_utxo_json(raw, address)?,
    };
    tracing::debug!(?format, count = utxos.len(), "Parsed UTxO response");
    Ok(utxos)
}

// =============================================================================
// Legacy text table
// =============================================================================

/// Parse the legacy table layout:
///
/// ```text
///                            TxHash                                 TxIx        Amount
/// --------------------------------------------------------------------------------------
/// 5ca53b0e...c15e9e3     0        1000000 lovelace + 5 29d2...70c6.4d494e + TxOutDatumHashNone
/// ```
pub fn parse_legacy_utxo_table(
    raw: &str,
    address: Option<&str>,
) -> std::result::Result<Vec<Utxo>, FormatError> {
    let address = Address::new(address.unwrap_or_default());
    let mut utxos = Vec::new();

    for (idx, line) in raw.lines().enumerate().skip(LEGACY_HEADER_LINES) {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let utxo = parse_legacy_line(line_no, line, &address).map_err(|e| {
            tracing::warn!(line_no, error = %e, "Malformed UTxO table line");
            e
        })?;
        utxos.push(utxo);
    }
    Ok(utxos)
}

fn parse_legacy_line(
    line_no: usize,
    line: &str,
    address: &Address,
) -> std::result::Result<Utxo, FormatError> {
    let invalid_line = || FormatError::InvalidUtxoLine {
        line_no,
        line: line.to_string(),
    };

    let mut fields = line.split_whitespace();
    let (tx_id, tx_index) = match (fields.next(), fields.next()) {
        (Some(tx_id), Some(tx_index)) => (tx_id, parse_tx_index(tx_index)?),
        _ => return Err(invalid_line()),
    };

    let rest = fields.collect::<Vec<_>>().join(" ");
    let mut parts: Vec<&str> = rest.split(" + ").collect();
    let datum = parts.pop().filter(|d| !d.is_empty()).ok_or_else(invalid_line)?;
    if parts.is_empty() {
        return Err(invalid_line());
    }

    let mut value = Value::new();
    for fund in parts {
        let (asset, amount) = parse_fund(fund)?;
        value.add(asset, amount);
    }

    Ok(Utxo {
        tx_id: tx_id.into(),
        tx_index,
        address: address.clone(),
        value,
        datum_hash: parse_datum_hash(datum)?,
    })
}

/// Parse the trailing datum descriptor of a legacy table line.
///
/// `TxOutDatumHashNone` and `TxOutDatumNone` mean no datum;
/// `TxOutDatumHash <era> "<hash>"` yields the 64-character hash.
pub fn parse_datum_hash(descriptor: &str) -> std::result::Result<Option<String>, FormatError> {
    let descriptor = descriptor.trim();
    if descriptor == DATUM_HASH_NONE || descriptor == DATUM_NONE {
        return Ok(None);
    }

    let invalid = || FormatError::InvalidDatum {
        input: descriptor.to_string(),
    };
    let quoted = descriptor
        .strip_prefix(DATUM_HASH_PREFIX)
        .and_then(|d| d.strip_suffix('"'))
        .ok_or_else(invalid)?;
    let (era, hash) = quoted
        .len()
        .checked_sub(DATUM_HASH_HEX_LEN)
        .and_then(|start| Some((quoted.get(..start)?, quoted.get(start..)?)))
        .ok_or_else(invalid)?;
    if !era.ends_with('"') || hex::decode(hash).is_err() {
        return Err(invalid());
    }
    Ok(Some(hash.to_string()))
}

// =============================================================================
// JSON
// =============================================================================

#[derive(Debug, Deserialize)]
struct RawTxOut {
    #[serde(default)]
    address: Option<String>,
    value: BTreeMap<String, Box<RawValue>>,
    #[serde(default, alias = "datumhash")]
    data: Option<String>,
}

/// Parse the JSON layout:
///
/// ```json
/// {
///   "<txId>#<txIx>": {
///     "address": "addr_test1...",
///     "value": { "lovelace": 3000000, "<policy>": { "<name>": 5 } },
///     "data": "<datum hash>"
///   }
/// }
/// ```
///
/// Entries come back ordered by key. An entry's own `address` wins over the
/// one the query was filtered by.
pub fn parse_utxo_json(
    raw: &[u8],
    address: Option<&str>,
) -> std::result::Result<Vec<Utxo>, FormatError> {
    let entries: BTreeMap<String, RawTxOut> = serde_json::from_slice(raw).map_err(json_error)?;

    let mut utxos = Vec::with_capacity(entries.len());
    for (key, tx_out) in entries {
        let tx_ref = parse_tx_ref(&key)?;
        let entry_address = tx_out
            .address
            .or_else(|| address.map(str::to_string))
            .unwrap_or_default();
        utxos.push(Utxo {
            tx_id: tx_ref.tx_id,
            tx_index: tx_ref.tx_index,
            address: Address::new(entry_address),
            value: parse_json_value(&tx_out.value)?,
            datum_hash: tx_out.data,
        });
    }
    Ok(utxos)
}

/// `lovelace` maps to an amount; every other key is a policy mapping token
/// names to amounts.
fn parse_json_value(
    raw: &BTreeMap<String, Box<RawValue>>,
) -> std::result::Result<Value, FormatError> {
    let mut value = Value::new();
    for (currency_symbol, entry) in raw {
        if currency_symbol == LOVELACE {
            value.add(ADA, parse_amount(entry.get())?);
            continue;
        }
        let tokens: BTreeMap<String, Box<RawValue>> =
            serde_json::from_str(entry.get()).map_err(json_error)?;
        for (token_name, amount) in tokens {
            value.add(
                Asset::new(currency_symbol.as_str(), token_name),
                parse_amount(amount.get())?,
            );
        }
    }
    Ok(value)
}

fn json_error(e: serde_json::Error) -> FormatError {
    FormatError::InvalidJson {
        message: e.to_string(),
    }
}

// =============================================================================
// References
// =============================================================================

/// Parse `txId#txIx`
pub fn parse_tx_ref(s: &str) -> std::result::Result<TxRef, FormatError> {
    let invalid = || FormatError::InvalidTxRef {
        input: s.to_string(),
    };
    let (tx_id, tx_index) = s.split_once('#').ok_or_else(invalid)?;
    if tx_id.is_empty() || tx_index.contains('#') {
        return Err(invalid());
    }
    let tx_index = parse_tx_index(tx_index).map_err(|_| invalid())?;
    Ok(TxRef::new(tx_id, tx_index))
}

fn parse_tx_index(s: &str) -> std::result::Result<u32, FormatError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::InvalidTxRef {
            input: s.to_string(),
        });
    }
    s.parse().map_err(|_| FormatError::InvalidTxRef {
        input: s.to_string(),
    })
}
