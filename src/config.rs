//! Anemone Configuration
//!
//! Loads and saves the runtime configuration from `~/.anemone/anemone.json`,
//! with environment variable overrides for the chain-facing settings.

use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::types::{AnemoneConfig, NaviObjects, Network};

/// Directory name under the user's home for all anemone data.
const ANEMONE_DIR_NAME: &str = ".anemone";

/// Config file name within the anemone directory.
const CONFIG_FILENAME: &str = "anemone.json";

/// Returns the anemone base directory: `~/.anemone`.
pub fn get_anemone_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/root"));
    home.join(ANEMONE_DIR_NAME)
}

/// Returns the full path to the config file: `~/.anemone/anemone.json`.
pub fn get_config_path() -> PathBuf {
    get_anemone_dir().join(CONFIG_FILENAME)
}

/// Baseline configuration for a fresh install.
pub fn default_config() -> AnemoneConfig {
    AnemoneConfig {
        network: Network::Testnet,
        rpc_url: String::new(),
        package_id: String::new(),
        mint_cap_id: String::new(),
        mapping_api_url: "https://sui-colearn.vercel.app".to_string(),
        relay_url: String::new(),
        navi: NaviObjects {
            open_api_url: "https://open-api.naviprotocol.io/api".to_string(),
            ..NaviObjects::default()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Load the config from disk, merging defaults for unset fields.
///
/// Returns `None` if the config file does not exist or cannot be parsed.
pub fn load_config() -> Option<AnemoneConfig> {
    let config_path = get_config_path();
    if !config_path.exists() {
        return None;
    }

    let contents = fs::read_to_string(&config_path).ok()?;
    let mut config: AnemoneConfig = serde_json::from_str(&contents).ok()?;

    // Merge defaults for unset fields
    let defaults = default_config();

    if config.mapping_api_url.is_empty() {
        config.mapping_api_url = defaults.mapping_api_url;
    }
    if config.navi.open_api_url.is_empty() {
        config.navi.open_api_url = defaults.navi.open_api_url;
    }
    if config.version.is_empty() {
        config.version = defaults.version;
    }

    Some(apply_env_overrides(config))
}

/// Load the config, or fall back to defaults plus env overrides.
pub fn load_or_default() -> AnemoneConfig {
    load_config().unwrap_or_else(|| apply_env_overrides(default_config()))
}

/// Save the config to disk at `~/.anemone/anemone.json`.
///
/// Creates the anemone directory with mode 0o700 if it does not exist. The
/// config file is written with mode 0o600 since it holds service URLs that
/// may embed credentials.
pub fn save_config(config: &AnemoneConfig) -> Result<()> {
    let dir = get_anemone_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir).context("Failed to create anemone directory")?;
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o700))?;
    }

    let config_path = get_config_path();
    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&config_path, &json).context("Failed to write config file")?;
    fs::set_permissions(&config_path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Recognized variables: `SUI_CHAIN`, `SUI_RPC_URL`, `ANEMONE_PACKAGE_ID`,
/// `ANEMONE_MINT_CAP_ID`, `ANEMONE_MAPPING_API_URL`, `ANEMONE_RELAY_URL`.
fn apply_env_overrides(mut config: AnemoneConfig) -> AnemoneConfig {
    if let Ok(chain) = env::var("SUI_CHAIN") {
        if let Ok(network) = chain.parse() {
            config.network = network;
        }
    }
    if let Ok(url) = env::var("SUI_RPC_URL") {
        config.rpc_url = url;
    }
    if let Ok(id) = env::var("ANEMONE_PACKAGE_ID") {
        config.package_id = id;
    }
    if let Ok(id) = env::var("ANEMONE_MINT_CAP_ID") {
        config.mint_cap_id = id;
    }
    if let Ok(url) = env::var("ANEMONE_MAPPING_API_URL") {
        config.mapping_api_url = url;
    }
    if let Ok(url) = env::var("ANEMONE_RELAY_URL") {
        config.relay_url = url;
    }
    config
}

/// Resolve the RPC URL based on the following priority:
/// 1. Explicit `rpc_url` in the config (already env-overridden)
/// 2. Chain-specific `SUI_RPC_URL_<CHAIN>` env var
/// 3. Default public fullnode for the configured network
pub fn resolve_rpc_url(config: &AnemoneConfig) -> String {
    if !config.rpc_url.is_empty() {
        return config.rpc_url.clone();
    }

    let chain_specific_var = format!("SUI_RPC_URL_{}", config.network.to_string().to_uppercase());
    if let Ok(chain_url) = env::var(&chain_specific_var) {
        return chain_url;
    }

    config.network.default_rpc_url()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_points_at_testnet() {
        let config = default_config();
        assert_eq!(config.network, Network::Testnet);
        assert!(config.rpc_url.is_empty());
        assert!(!config.mapping_api_url.is_empty());
    }

    #[test]
    fn test_resolve_rpc_url_prefers_explicit() {
        let mut config = default_config();
        config.rpc_url = "http://localhost:9999".to_string();
        assert_eq!(resolve_rpc_url(&config), "http://localhost:9999");
    }

    #[test]
    fn test_resolve_rpc_url_falls_back_to_network_default() {
        let mut config = default_config();
        config.network = Network::Mainnet;
        config.rpc_url = String::new();
        assert_eq!(resolve_rpc_url(&config), "https://fullnode.mainnet.sui.io:443");
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = default_config();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AnemoneConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.network, config.network);
        assert_eq!(parsed.mapping_api_url, config.mapping_api_url);
    }
}
