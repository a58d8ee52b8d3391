//! Configuration types for Forge

use serde::{Deserialize, Serialize};

use crate::{Era, Network};

/// Settings for talking to the external node command-line tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Path of the tool binary (e.g., "cardano-cli")
    #[serde(default = "default_cli_path")]
    pub cli_path: String,

    /// Protocol parameters file passed to every build command
    #[serde(default = "default_protocol_params_path")]
    pub protocol_params_path: String,

    /// Network selected on commands that talk to the node
    #[serde(default)]
    pub network: Network,

    /// Era flag to emit after the build sub-command (optional)
    #[serde(default)]
    pub era: Option<Era>,

    /// Log the content of every materialized datum/redeemer/metadata file
    #[serde(default)]
    pub log_temp_files: bool,
}

fn default_cli_path() -> String {
    "cardano-cli".to_string()
}

fn default_protocol_params_path() -> String {
    "protocol-params.json".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            cli_path: default_cli_path(),
            protocol_params_path: default_protocol_params_path(),
            network: Network::default(),
            era: None,
            log_temp_files: false,
        }
    }
}
