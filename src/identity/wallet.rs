//! Operator Wallet
//!
//! Creates and manages the local ed25519 wallet used to sign skill-manager
//! and mint transactions from the CLI. The agent's own bot key never lives
//! here; it stays with the mapping service.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sui_crypto::ed25519::Ed25519PrivateKey;
use sui_sdk_types as sui;

use crate::config::get_anemone_dir;
use crate::identity::keypair::{decode_secret_key, derive_address};

/// Wallet file name within the anemone directory.
const WALLET_FILENAME: &str = "wallet.json";

/// On-disk wallet representation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletData {
    /// Hex-encoded ed25519 private key with "0x" prefix.
    pub private_key: String,
    /// ISO-8601 timestamp of when this wallet was created.
    pub created_at: String,
}

/// Returns the full path to the wallet file: `~/.anemone/wallet.json`.
pub fn get_wallet_path() -> PathBuf {
    get_anemone_dir().join(WALLET_FILENAME)
}

/// Get or create the operator wallet.
///
/// If a wallet file already exists, loads the private key from it. Otherwise,
/// generates a new random ed25519 key and persists it with mode 0o600.
///
/// Returns the address, the signing key, and whether a new wallet was created.
pub fn get_wallet() -> Result<(sui::Address, Ed25519PrivateKey, bool)> {
    let dir = get_anemone_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir).context("Failed to create anemone directory")?;
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o700))
            .context("Failed to set directory permissions")?;
    }

    let wallet_path = get_wallet_path();

    if wallet_path.exists() {
        // Load existing wallet
        let contents =
            fs::read_to_string(&wallet_path).context("Failed to read wallet file")?;
        let wallet_data: WalletData =
            serde_json::from_str(&contents).context("Failed to parse wallet JSON")?;

        let bytes = decode_secret_key(&wallet_data.private_key)
            .context("Failed to parse private key from wallet file")?;
        let address = derive_address(&bytes);

        Ok((address, Ed25519PrivateKey::new(bytes), false))
    } else {
        // Generate new wallet
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        let address = derive_address(&bytes);

        let wallet_data = WalletData {
            private_key: format!("0x{}", hex::encode(bytes)),
            created_at: Utc::now().to_rfc3339(),
        };

        let json =
            serde_json::to_string_pretty(&wallet_data).context("Failed to serialize wallet")?;

        fs::write(&wallet_path, &json).context("Failed to write wallet file")?;
        fs::set_permissions(&wallet_path, fs::Permissions::from_mode(0o600))
            .context("Failed to set wallet file permissions")?;

        Ok((address, Ed25519PrivateKey::new(bytes), true))
    }
}

/// Get the wallet's Sui address without keeping the signing key around.
///
/// Returns `None` if the wallet file does not exist or cannot be read.
pub fn get_wallet_address() -> Option<String> {
    let wallet_path = get_wallet_path();
    if !wallet_path.exists() {
        return None;
    }

    let contents = fs::read_to_string(&wallet_path).ok()?;
    let wallet_data: WalletData = serde_json::from_str(&contents).ok()?;

    let bytes = decode_secret_key(&wallet_data.private_key).ok()?;
    Some(derive_address(&bytes).to_string())
}

/// Check whether a wallet file exists on disk.
pub fn wallet_exists() -> bool {
    get_wallet_path().exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_path_is_under_anemone_dir() {
        let path = get_wallet_path();
        assert!(path.ends_with("wallet.json"));
        assert!(path.starts_with(get_anemone_dir()));
    }
}
