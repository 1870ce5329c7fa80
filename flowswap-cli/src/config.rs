//! TOML configuration: a plain `Deserialize` struct read from a path
//! given on the command line.

use std::path::Path;

use eyre::{eyre, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FlowSwapConfig {
    pub persistence_dir: String,
    pub btc: BtcNodeConfig,
    pub m1: M1NodeConfig,
    pub evm: EvmNodeConfig,
    #[serde(default)]
    pub limits: LimitsSection,
}

#[derive(Debug, Deserialize)]
pub struct BtcNodeConfig {
    pub rpc_url: String,
    pub rpc_username: String,
    pub rpc_password: String,
    #[serde(default)]
    pub network: String,
}

#[derive(Debug, Deserialize)]
pub struct M1NodeConfig {
    pub rpc_url: String,
    #[serde(default)]
    pub rpc_username: String,
    #[serde(default)]
    pub rpc_password: String,
}

#[derive(Debug, Deserialize)]
pub struct EvmNodeConfig {
    pub rpc_url: String,
    pub htlc_contract_address: String,
    pub token_contract_address: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct LimitsSection {
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_swaps: u32,
}

fn default_max_concurrent() -> u32 {
    5
}

pub fn load(config_path: impl AsRef<Path>) -> Result<FlowSwapConfig> {
    let path = config_path.as_ref();
    if !path.exists() {
        return Err(eyre!("config file not found: {}", path.display()));
    }
    let content = std::fs::read_to_string(path)?;
    let config: FlowSwapConfig = toml::from_str(&content)?;
    Ok(config)
}
