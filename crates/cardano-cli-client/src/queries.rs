//! Argument lists for node queries and transaction follow-up commands
//!
//! Commands that reach the node carry the network selection at the end;
//! offline commands (`txid`, `policyid`, `assemble`, `hash-script-data`)
//! do not.

use forge_core::{CliConfig, Network};

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

/// Append the network selection flags
pub fn with_network(mut args: Vec<String>, network: Network) -> Vec<String> {
    args.extend(network.args());
    args
}

pub fn query_tip_args(network: Network) -> Vec<String> {
    with_network(args(&["query", "tip"]), network)
}

pub fn query_protocol_params_args(network: Network) -> Vec<String> {
    with_network(args(&["query", "protocol-parameters"]), network)
}

/// UTxOs at `address`, or the whole UTxO set when no address is given
pub fn query_utxo_args(network: Network, address: Option<&str>) -> Vec<String> {
    let query = match address {
        Some(addr) => args(&["query", "utxo", "--address", addr]),
        None => args(&["query", "utxo", "--whole-utxo"]),
    };
    with_network(query, network)
}

/// Arguments produced by [`crate::build_tx_args`] plus the output file.
/// Balanced builds query the node and so also carry the network.
pub fn build_tx_command(
    mut build_args: Vec<String>,
    out_file: &str,
    raw: bool,
    config: &CliConfig,
) -> Vec<String> {
    build_args.push("--out-file".to_string());
    build_args.push(out_file.to_string());
    if raw {
        build_args
    } else {
        with_network(build_args, config.network)
    }
}

pub fn tx_id_args(tx_body_file: &str) -> Vec<String> {
    args(&["transaction", "txid", "--tx-body-file", tx_body_file])
}

pub fn sign_tx_args(
    network: Network,
    tx_body_file: &str,
    skey_file: &str,
    out_file: &str,
) -> Vec<String> {
    with_network(
        args(&[
            "transaction",
            "sign",
            "--tx-body-file",
            tx_body_file,
            "--signing-key-file",
            skey_file,
            "--out-file",
            out_file,
        ]),
        network,
    )
}

pub fn assemble_tx_args(tx_body_file: &str, witness_file: &str, out_file: &str) -> Vec<String> {
    args(&[
        "transaction",
        "assemble",
        "--tx-body-file",
        tx_body_file,
        "--witness-file",
        witness_file,
        "--out-file",
        out_file,
    ])
}

pub fn submit_tx_args(network: Network, tx_file: &str) -> Vec<String> {
    with_network(args(&["transaction", "submit", "--tx-file", tx_file]), network)
}

pub fn policy_id_args(script_file: &str) -> Vec<String> {
    args(&["transaction", "policyid", "--script-file", script_file])
}

pub fn script_address_args(network: Network, script_file: &str) -> Vec<String> {
    with_network(
        args(&["address", "build", "--payment-script-file", script_file]),
        network,
    )
}

pub fn hash_script_data_args(datum_file: &str) -> Vec<String> {
    args(&["transaction", "hash-script-data", "--script-data-file", datum_file])
}

/// Multi-line rendering of an argument list for logs: each flag starts a new
/// indented line and output values are broken at ` + `.
pub fn format_cli_args(args: &[String]) -> String {
    let mut out = String::new();
    for arg in args {
        if !out.is_empty() {
            out.push_str(if arg.starts_with("--") { "\n  " } else { " " });
        }
        if is_output_arg(arg) {
            out.push_str(&arg.replace(" + ", "\n    + "));
        } else {
            out.push_str(arg);
        }
    }
    out
}

fn is_output_arg(arg: &str) -> bool {
    arg.starts_with("addr") && arg.contains(" + ")
}
