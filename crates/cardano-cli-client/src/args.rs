//! Transaction build arguments
//!
//! Renders a [`TxBuilder`] into the argument list of
//! `cardano-cli transaction build` / `build-raw`, in this fixed order:
//! 1. sub-command with fee (raw) or change address (balanced)
//! 2. public-key inputs, then script inputs with their files
//! 3. collateral inputs
//! 4. public-key outputs, then script outputs with their datum
//! 5. Plutus mint/burn policies, native policy files, net `--mint` value
//! 6. validity interval, metadata, required signers
//! 7. protocol parameters file

use cardano_ledger::{TxRef, Value};
use cardano_tx::{ExUnits, MintingPolicy, OutputDatum, TxBuilder, TxOutput};
use forge_core::{CliConfig, ModelError};
use indexmap::IndexSet;

use crate::materialize::{kind, Materializer};
use crate::queries::format_cli_args;
use crate::Result;

/// Example: `5ca53b0eb10f317a5f1bf1bda679a04a8dd01c156643deee1d406ec2cc15e9e3#0`
pub fn build_input(tx_ref: &TxRef) -> String {
    tx_ref.to_string()
}

/// Example: `100 lovelace + 42 5ca53b0e...c15e9e3.666f6f`
///
/// Zero-amount entries are left out.
pub fn build_value(value: &Value) -> String {
    value.trim().to_string()
}

/// Example: `addr_test1... + 100 lovelace`
pub fn build_output(output: &TxOutput) -> String {
    format!("{} + {}", output.address, build_value(&output.value))
}

pub fn build_ex_units(ex_units: &ExUnits) -> String {
    ex_units.to_string()
}

/// Render `builder` as node tool arguments.
///
/// Datum, redeemer and metadata payloads are handed to `materializer`; the
/// references it returns appear in the arguments. Model inconsistencies
/// (balanced mode without change address, raw mode without execution units)
/// are reported here rather than when the builder is assembled.
pub fn build_tx_args(
    builder: &TxBuilder,
    config: &CliConfig,
    materializer: &mut dyn Materializer,
) -> Result<Vec<String>> {
    let mut w = ArgWriter {
        args: Vec::new(),
        materializer,
        log_temp_files: config.log_temp_files,
    };
    let raw = builder.is_raw();

    w.push("transaction");
    w.push(if raw { "build-raw" } else { "build" });
    if let Some(era) = config.era {
        w.push(era.flag());
    }
    match (raw, builder.fee, &builder.change_address) {
        (true, Some(fee), _) => w.flag("--fee", fee.to_string()),
        (false, _, Some(addr)) if !addr.is_empty() => w.flag("--change-address", addr.as_str()),
        _ => return Err(ModelError::MissingChangeAddress.into()),
    }

    // Inputs
    for input in &builder.pub_key_inputs {
        w.flag("--tx-in", build_input(&input.tx_ref));
    }
    for input in &builder.script_inputs {
        let tx_ref = &input.input.tx_ref;
        w.flag("--tx-in", build_input(tx_ref));
        w.flag("--tx-in-script-file", input.script_file.as_str());
        let datum_file = w.temp_file(kind::INPUT_DATUM, &input.datum)?;
        w.flag("--tx-in-datum-file", datum_file);
        let redeemer_file = w.temp_file(kind::INPUT_REDEEMER, &input.redeemer)?;
        w.flag("--tx-in-redeemer-file", redeemer_file);
        if raw {
            let ex_units = require_ex_units(input.ex_units, || format!("script input {}", tx_ref))?;
            w.flag("--tx-in-execution-units", build_ex_units(&ex_units));
        }
    }
    for collateral in &builder.collaterals {
        w.flag("--tx-in-collateral", build_input(collateral));
    }

    // Outputs
    for output in &builder.pub_key_outputs {
        w.flag("--tx-out", build_output(output));
    }
    for output in &builder.script_outputs {
        w.flag("--tx-out", build_output(&output.output));
        match &output.datum {
            OutputDatum::Hash(hash) => w.flag("--tx-out-datum-hash", hash.as_str()),
            OutputDatum::Embedded(datum) => {
                let datum_file = w.temp_file(kind::OUTPUT_DATUM_EMBED, datum)?;
                w.flag("--tx-out-datum-embed-file", datum_file);
            }
        }
    }

    // Minting and burning
    let mut native_scripts: IndexSet<&str> = IndexSet::new();
    let actions = builder
        .minting
        .iter()
        .map(|a| ("mint", a))
        .chain(builder.burning.iter().map(|a| ("burn", a)));
    for (action, forge) in actions {
        match &forge.policy {
            MintingPolicy::Plutus {
                script_file,
                redeemer,
                ex_units,
            } => {
                w.flag("--mint-script-file", script_file.as_str());
                let redeemer_file = w.temp_file(kind::MINT_REDEEMER, redeemer)?;
                w.flag("--mint-redeemer-file", redeemer_file);
                if raw {
                    let ex_units =
                        require_ex_units(*ex_units, || format!("{} with {}", action, script_file))?;
                    w.flag("--mint-execution-units", build_ex_units(&ex_units));
                }
            }
            MintingPolicy::Native { script_file } => {
                native_scripts.insert(script_file.as_str());
            }
        }
    }
    for script_file in native_scripts {
        w.flag("--mint-script-file", script_file);
    }
    let forge_value = builder.forge_value();
    if !forge_value.is_empty() {
        w.flag("--mint", build_value(&forge_value));
    }

    // Validity interval
    if let Some(from) = builder.valid_range_from {
        w.flag("--invalid-before", from.to_string());
    }
    if let Some(to) = builder.valid_range_to {
        w.flag("--invalid-hereafter", to.to_string());
    }

    if let Some(metadata) = &builder.json_metadata {
        let metadata_file = w.temp_file(kind::METADATA_JSON, metadata)?;
        w.flag("--metadata-json-file", metadata_file);
    }

    for skey in &builder.signer_skey_paths {
        w.flag("--required-signer", skey.as_str());
    }
    for vkey_hash in &builder.required_signer_vkey_hashes {
        w.flag("--required-signer-hash", vkey_hash.as_str());
    }

    w.flag("--protocol-params-file", config.protocol_params_path.as_str());

    tracing::debug!(
        raw,
        arg_count = w.args.len(),
        "Built transaction arguments:\n{}",
        format_cli_args(&w.args)
    );
    Ok(w.args)
}

fn require_ex_units(
    ex_units: Option<ExUnits>,
    item: impl FnOnce() -> String,
) -> std::result::Result<ExUnits, ModelError> {
    ex_units.ok_or_else(|| ModelError::MissingExUnits { item: item() })
}

struct ArgWriter<'m> {
    args: Vec<String>,
    materializer: &'m mut dyn Materializer,
    log_temp_files: bool,
}

impl ArgWriter<'_> {
    fn push(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    fn flag(&mut self, name: &str, value: impl Into<String>) {
        self.push(name);
        self.push(value);
    }

    fn temp_file(&mut self, kind: &str, content: &str) -> Result<String> {
        let reference = self.materializer.materialize(kind, content)?;
        if self.log_temp_files {
            let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
            tracing::debug!(kind, reference = %reference, content = %compact, "Materialized temp file");
        } else {
            tracing::debug!(kind, reference = %reference, "Materialized temp file");
        }
        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use cardano_ledger::{Asset, Utxo};
    use forge_core::{Address, Era, Error, MaterializeError};

    use super::*;
    use crate::materialize::MemoryMaterializer;

    const POLICY: &str = "29d222ce763455e3d7a09a665ce554f00ac89d2e99a1a83d267170c6";
    const TX1: &str = "5ca53b0eb10f317a5f1bf1bda679a04a8dd01c156643deee1d406ec2cc15e9e3";
    const SENDER: &str = "addr_test1qpmtp5t0t5y6cqkaz7rfsyrx7mld77kpvksgkwm0p7en7q";
    const RECEIVER: &str = "addr_test1qr2tn9mcgzu08lskmnekswwg9ghfrzhtlzx9t2vm4r96sk";

    fn mock_utxo(index: u32, lovelace: u64) -> Utxo {
        Utxo::new(TX1, index, Address::new(SENDER), Value::lovelace(lovelace))
    }

    fn token() -> Asset {
        Asset::new(POLICY, "4d494e")
    }

    fn build(builder: &TxBuilder) -> (Vec<String>, MemoryMaterializer) {
        let mut m = MemoryMaterializer::new();
        let args = build_tx_args(builder, &CliConfig::default(), &mut m).unwrap();
        (args, m)
    }

    fn value_after<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
        args.windows(2)
            .filter(|w| w[0] == flag)
            .map(|w| w[1].as_str())
            .collect()
    }

    fn count(args: &[String], flag: &str) -> usize {
        args.iter().filter(|a| *a == flag).count()
    }

    #[test]
    fn test_simple_transfer() {
        let mut b = TxBuilder::new();
        b.spend_pub_key_utxos(&[mock_utxo(0, 50_000_000)])
            .pay_change_to(SENDER)
            .pay_to_pub_key(RECEIVER, Value::lovelace(10_000_000u64));

        let (args, m) = build(&b);
        let expected: Vec<String> = [
            "transaction",
            "build",
            "--change-address",
            SENDER,
            "--tx-in",
            format!("{}#0", TX1).as_str(),
            "--tx-out",
            format!("{} + 10000000 lovelace", RECEIVER).as_str(),
            "--protocol-params-file",
            "protocol-params.json",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(args, expected);
        assert!(m.artifacts().is_empty());
    }

    #[test]
    fn test_balanced_mode_omits_fee_and_ex_units() {
        let mut b = TxBuilder::new();
        b.pay_fee(0)
            .pay_change_to(SENDER)
            .spend_script_utxo_raw(&mock_utxo(1, 5), "pool.plutus", "{}", "{}", ExUnits::new(1, 2))
            .mint_assets(Value::new().with(token(), 1u64), "mint.plutus", "{}");

        let (args, _) = build(&b);
        assert_eq!(args[1], "build");
        assert_eq!(count(&args, "--fee"), 0);
        assert_eq!(value_after(&args, "--change-address"), vec![SENDER]);
        assert_eq!(count(&args, "--tx-in-execution-units"), 0);
        assert_eq!(count(&args, "--mint-execution-units"), 0);
    }

    #[test]
    fn test_raw_mode_emits_fee_and_ex_units() {
        let mut b = TxBuilder::new();
        b.pay_fee(200_000)
            .pay_change_to(SENDER)
            .spend_script_utxo_raw(&mock_utxo(1, 5), "pool.plutus", "{}", "{}", ExUnits::new(10, 20))
            .mint_assets_raw(
                Value::new().with(token(), 1u64),
                "mint.plutus",
                "{}",
                ExUnits::new(30, 40),
            )
            .burn_assets_raw(
                Value::new().with(Asset::new(POLICY, ""), 1u64),
                "burn.plutus",
                "{}",
                ExUnits::new(50, 60),
            );

        let (args, _) = build(&b);
        assert_eq!(args[1], "build-raw");
        assert_eq!(value_after(&args, "--fee"), vec!["200000"]);
        assert_eq!(count(&args, "--change-address"), 0);
        assert_eq!(value_after(&args, "--tx-in-execution-units"), vec!["(10,20)"]);
        assert_eq!(
            value_after(&args, "--mint-execution-units"),
            vec!["(30,40)", "(50,60)"]
        );
    }

    #[test]
    fn test_raw_mode_requires_ex_units() {
        let mut b = TxBuilder::new();
        b.pay_fee(200_000)
            .spend_script_utxo(&mock_utxo(1, 5), "pool.plutus", "{}", "{}");

        let mut m = MemoryMaterializer::new();
        let err = build_tx_args(&b, &CliConfig::default(), &mut m).unwrap_err();
        match err {
            Error::Model(ModelError::MissingExUnits { item }) => {
                assert_eq!(item, format!("script input {}#1", TX1));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_balanced_mode_requires_change_address() {
        let b = TxBuilder::new();
        let mut m = MemoryMaterializer::new();
        let err = build_tx_args(&b, &CliConfig::default(), &mut m).unwrap_err();
        assert!(matches!(err, Error::Model(ModelError::MissingChangeAddress)));

        let mut b = TxBuilder::new();
        b.pay_change_to("");
        let err = build_tx_args(&b, &CliConfig::default(), &mut m).unwrap_err();
        assert_eq!(err.error_code(), "missing_change_address");
    }

    #[test]
    fn test_script_input_materializes_datum_and_redeemer() {
        let mut b = TxBuilder::new();
        b.pay_change_to(SENDER).spend_script_utxo(
            &mock_utxo(2, 5),
            "pool.plutus",
            "{\"constructor\": 0, \"fields\": []}",
            "{\"int\": 7}",
        );

        let (args, m) = build(&b);
        let idx = args.iter().position(|a| a == "--tx-in-script-file").unwrap();
        assert_eq!(
            &args[idx - 2..idx + 6],
            &[
                "--tx-in",
                format!("{}#2", TX1).as_str(),
                "--tx-in-script-file",
                "pool.plutus",
                "--tx-in-datum-file",
                "input-datum-0",
                "--tx-in-redeemer-file",
                "input-redeemer-1",
            ]
        );
        assert_eq!(
            m.get("input-datum-0").unwrap().content,
            "{\"constructor\": 0, \"fields\": []}"
        );
        assert_eq!(m.get("input-redeemer-1").unwrap().content, "{\"int\": 7}");
    }

    #[test]
    fn test_collateral_and_script_outputs() {
        let mut b = TxBuilder::new();
        b.pay_change_to(SENDER)
            .use_collaterals(&[mock_utxo(3, 5_000_000)])
            .pay_to_script(
                "addr_test1wscript",
                Value::lovelace(2_000_000u64),
                OutputDatum::Hash("ab".repeat(32)),
            )
            .pay_to_script(
                "addr_test1wscript",
                Value::lovelace(3_000_000u64),
                OutputDatum::Embedded("{\"int\": 1}".to_string()),
            );

        let (args, m) = build(&b);
        assert_eq!(value_after(&args, "--tx-in-collateral"), vec![format!("{}#3", TX1)]);
        assert_eq!(
            value_after(&args, "--tx-out"),
            vec![
                "addr_test1wscript + 2000000 lovelace",
                "addr_test1wscript + 3000000 lovelace"
            ]
        );
        assert_eq!(value_after(&args, "--tx-out-datum-hash"), vec!["ab".repeat(32)]);
        assert_eq!(
            value_after(&args, "--tx-out-datum-embed-file"),
            vec!["output-datum-embed-0"]
        );
        assert_eq!(m.artifacts()[0].content, "{\"int\": 1}");
    }

    #[test]
    fn test_mint_and_burn_net_into_single_mint_token() {
        let mut b = TxBuilder::new();
        b.pay_change_to(SENDER)
            .mint_assets(Value::new().with(token(), 10u64), "policy.plutus", "{}")
            .burn_assets(Value::new().with(token(), 4u64), "policy.plutus", "{}");

        let (args, _) = build(&b);
        assert_eq!(
            value_after(&args, "--mint"),
            vec![format!("6 {}.4d494e", POLICY)]
        );
        assert_eq!(count(&args, "--mint-script-file"), 2);
        assert_eq!(
            value_after(&args, "--mint-redeemer-file"),
            vec!["mint-redeemer-0", "mint-redeemer-1"]
        );
    }

    #[test]
    fn test_outputs_skip_zero_amounts() {
        let tok = Asset::new("aa", "bb");
        let mut paid = Value::lovelace(2_000_000u64);
        paid.add(tok.clone(), 5u64).add(tok.clone(), -5i64);
        let mut locked = Value::lovelace(3_000_000u64);
        locked.add(tok.clone(), 7u64).add(tok, -7i64);

        let mut b = TxBuilder::new();
        b.pay_change_to(SENDER)
            .pay_to_pub_key("addr_test1y", paid)
            .pay_to_script("addr_test1w", locked, OutputDatum::Hash("ab".repeat(32)));

        let (args, _) = build(&b);
        assert_eq!(
            value_after(&args, "--tx-out"),
            vec!["addr_test1y + 2000000 lovelace", "addr_test1w + 3000000 lovelace"]
        );
        assert!(!args.iter().any(|a| a.contains("0 aa.bb")));
    }

    #[test]
    fn test_raw_mode_native_mint_needs_no_ex_units() {
        let mut b = TxBuilder::new();
        b.pay_fee(180_000)
            .mint_native_assets(Value::new().with(token(), 3u64), "a.script")
            .burn_native_assets(Value::new().with(token(), 1u64), "a.script");

        let (args, m) = build(&b);
        assert_eq!(args[1], "build-raw");
        assert_eq!(count(&args, "--mint-execution-units"), 0);
        assert_eq!(count(&args, "--mint-redeemer-file"), 0);
        assert_eq!(value_after(&args, "--mint-script-file"), vec!["a.script"]);
        assert_eq!(value_after(&args, "--mint"), vec![format!("2 {}.4d494e", POLICY)]);
        assert!(m.artifacts().is_empty());
    }

    #[test]
    fn test_native_scripts_are_deduplicated() {
        let other = Asset::new(POLICY, "");
        let mut b = TxBuilder::new();
        b.pay_change_to(SENDER)
            .mint_native_assets(Value::new().with(token(), 5u64), "a.script")
            .mint_native_assets(Value::new().with(other.clone(), 5u64), "b.script")
            .burn_native_assets(Value::new().with(other, 2u64), "a.script");

        let (args, m) = build(&b);
        assert_eq!(value_after(&args, "--mint-script-file"), vec!["a.script", "b.script"]);
        assert_eq!(count(&args, "--mint-redeemer-file"), 0);
        assert_eq!(
            value_after(&args, "--mint"),
            vec![format!("3 {p} + 5 {p}.4d494e", p = POLICY)]
        );
        assert!(m.artifacts().is_empty());
    }

    #[test]
    fn test_fully_burned_forge_value_emits_no_mint() {
        let mut b = TxBuilder::new();
        b.pay_change_to(SENDER)
            .mint_native_assets(Value::new().with(token(), 5u64), "a.script")
            .burn_native_assets(Value::new().with(token(), 5u64), "a.script");

        let (args, _) = build(&b);
        assert_eq!(count(&args, "--mint"), 0);
        assert_eq!(value_after(&args, "--mint-script-file"), vec!["a.script"]);
    }

    #[test]
    fn test_burn_only_renders_negative_amount() {
        let mut b = TxBuilder::new();
        b.pay_change_to(SENDER)
            .burn_assets(Value::new().with(token(), 4u64), "policy.plutus", "{}");

        let (args, _) = build(&b);
        assert_eq!(
            value_after(&args, "--mint"),
            vec![format!("-4 {}.4d494e", POLICY)]
        );
    }

    #[test]
    fn test_validity_metadata_and_signers() {
        let mut b = TxBuilder::new();
        b.pay_change_to(SENDER)
            .set_valid_range_to(5_000)
            .set_json_metadata("{\"674\": {\"msg\": [\"hi\"]}}")
            .add_signer_skey("payment.skey")
            .add_required_signer_vkey_hash("ab".repeat(28));

        let (args, m) = build(&b);
        assert_eq!(count(&args, "--invalid-before"), 0);
        assert_eq!(value_after(&args, "--invalid-hereafter"), vec!["5000"]);
        assert_eq!(value_after(&args, "--metadata-json-file"), vec!["metadata-json-0"]);
        assert_eq!(m.artifacts()[0].content, "{\"674\": {\"msg\": [\"hi\"]}}");
        assert_eq!(value_after(&args, "--required-signer"), vec!["payment.skey"]);
        assert_eq!(
            value_after(&args, "--required-signer-hash"),
            vec!["ab".repeat(28)]
        );

        let n = args.len();
        assert_eq!(args[n - 2], "--protocol-params-file");
        assert_eq!(args[n - 1], "protocol-params.json");
    }

    #[test]
    fn test_era_flag_and_params_path_from_config() {
        let config = CliConfig {
            era: Some(Era::Babbage),
            protocol_params_path: "/tmp/pp.json".to_string(),
            ..CliConfig::default()
        };
        let mut b = TxBuilder::new();
        b.pay_change_to(SENDER);

        let mut m = MemoryMaterializer::new();
        let args = build_tx_args(&b, &config, &mut m).unwrap();
        assert_eq!(&args[..3], &["transaction", "build", "--babbage-era"]);
        assert_eq!(args.last().map(String::as_str), Some("/tmp/pp.json"));
    }

    #[test]
    fn test_materializer_error_aborts() {
        let mut b = TxBuilder::new();
        b.pay_change_to(SENDER).set_json_metadata("{}");

        let mut failing = |kind: &str, _: &str| -> std::result::Result<String, MaterializeError> {
            Err(MaterializeError {
                kind: kind.to_string(),
                message: "no space left".to_string(),
            })
        };
        let err = build_tx_args(&b, &CliConfig::default(), &mut failing).unwrap_err();
        assert_eq!(err.error_code(), "materialize_failed");
    }
}
