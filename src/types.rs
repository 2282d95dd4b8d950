//! Shared types for the Anemone runtime.
//!
//! Domain records, client traits, and the configuration schema live here so
//! the rest of the crate can depend on them without cycles.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Sui network the runtime is pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    /// Default public fullnode URL for this network.
    pub fn default_rpc_url(&self) -> String {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443".to_string(),
            Network::Testnet => "https://fullnode.testnet.sui.io:443".to_string(),
            Network::Devnet => "https://fullnode.devnet.sui.io:443".to_string(),
            Network::Localnet => "http://127.0.0.1:9000".to_string(),
        }
    }

    /// Explorer link for a transaction digest on this network.
    pub fn transaction_link(&self, digest: &str) -> String {
        match self {
            Network::Mainnet => format!("https://suivision.xyz/txblock/{}", digest),
            Network::Testnet => format!("https://testnet.suivision.xyz/txblock/{}", digest),
            Network::Devnet => format!("https://devnet.suivision.xyz/txblock/{}", digest),
            Network::Localnet => format!("localhost : {}", digest),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "localnet" => Ok(Network::Localnet),
            other => anyhow::bail!(
                "Invalid network '{}'. Must be one of: mainnet, testnet, devnet, localnet",
                other
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Runtime configuration, persisted at `~/.anemone/anemone.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnemoneConfig {
    /// Sui network to operate on.
    pub network: Network,
    /// Fullnode RPC URL. Empty means "derive from network".
    #[serde(default)]
    pub rpc_url: String,
    /// Published anemone Move package ID.
    #[serde(default)]
    pub package_id: String,
    /// Shared MintCap object consumed by `create_role`.
    #[serde(default)]
    pub mint_cap_id: String,
    /// Base URL of the NFT mapping service.
    #[serde(default)]
    pub mapping_api_url: String,
    /// Base URL of the agent chat relay.
    #[serde(default)]
    pub relay_url: String,
    /// Navi protocol objects (mainnet only; empty until configured).
    #[serde(default)]
    pub navi: NaviObjects,
    /// Config schema version.
    #[serde(default)]
    pub version: String,
}

/// On-chain objects the Navi lending calls are addressed at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaviObjects {
    pub package_id: String,
    pub storage_id: String,
    pub sui_pool_id: String,
    pub oracle_id: String,
    pub incentive_v1_id: String,
    pub incentive_v2_id: String,
    /// Navi asset index for SUI.
    pub sui_asset_id: u8,
    /// Base URL of the Navi open API used for portfolio queries.
    pub open_api_url: String,
}

impl NaviObjects {
    /// True when every on-chain object needed for mutating calls is set.
    pub fn is_configured(&self) -> bool {
        !self.package_id.is_empty()
            && !self.storage_id.is_empty()
            && !self.sui_pool_id.is_empty()
            && !self.incentive_v1_id.is_empty()
            && !self.incentive_v2_id.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Domain records
// ---------------------------------------------------------------------------

/// Off-chain record linking a bot address to its Role and BotNFT.
/// The mapping service never returns the private key through the list API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NftMapping {
    #[serde(default)]
    pub id: Option<i64>,
    pub role_id: String,
    pub nft_id: String,
    pub address: String,
    #[serde(default)]
    pub created_at: String,
}

/// On-chain Role state as read back from the object store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleInfo {
    pub id: String,
    /// SUI balance held by the role, in MIST.
    pub balance: u64,
    pub is_active: bool,
    pub is_locked: bool,
    /// Health counter maintained by `update_role_health`.
    pub health: u64,
    /// IDs of skills attached to this role.
    pub skills: Vec<String>,
    pub bot_address: String,
}

/// Display fields of a BotNFT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotNftInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
}

/// On-chain Skill descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub doc: String,
    /// Usage fee in MIST.
    pub fee: u64,
    pub is_enabled: bool,
}

/// Outcome of an executed transaction, shaped for user-facing surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxResult {
    pub success: bool,
    /// Transaction digest; empty on failure before submission.
    pub tx: String,
    pub message: String,
}

impl TxResult {
    pub fn ok(digest: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            tx: digest.into(),
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            tx: String::new(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Client traits
// ---------------------------------------------------------------------------

/// Mapping service operations. The HTTP implementation lives in
/// [`crate::api`]; tests substitute an in-memory store.
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Ask the service to generate a fresh bot address (the service keeps the
    /// key and serves it back through `private_key`).
    async fn generate_address(&self) -> Result<String>;

    /// Persist the address -> (role, nft) mapping after a successful mint.
    async fn store_mapping(&self, address: &str, nft_id: &str, role_id: &str) -> Result<()>;

    /// All known mappings, without private keys.
    async fn list_mappings(&self) -> Result<Vec<NftMapping>>;

    /// The signing key for a role. Errors when the service has no record.
    async fn private_key(&self, role_id: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_round_trip() {
        for s in ["mainnet", "testnet", "devnet", "localnet"] {
            let n: Network = s.parse().unwrap();
            assert_eq!(n.to_string(), s);
        }
        assert!("ropsten".parse::<Network>().is_err());
    }

    #[test]
    fn test_transaction_link_per_network() {
        let digest = "39a8c432d9bdad993a33cc1faf2e9b58";
        assert_eq!(
            Network::Mainnet.transaction_link(digest),
            format!("https://suivision.xyz/txblock/{}", digest)
        );
        assert_eq!(
            Network::Testnet.transaction_link(digest),
            format!("https://testnet.suivision.xyz/txblock/{}", digest)
        );
        assert!(Network::Localnet.transaction_link(digest).contains(digest));
    }

    #[test]
    fn test_navi_objects_configured() {
        let mut navi = NaviObjects::default();
        assert!(!navi.is_configured());
        navi.package_id = "0x1".into();
        navi.storage_id = "0x2".into();
        navi.sui_pool_id = "0x3".into();
        navi.incentive_v1_id = "0x4".into();
        navi.incentive_v2_id = "0x5".into();
        assert!(navi.is_configured());
    }
}
