//! Bot signer resolution.
//!
//! A Role's signing key is held by the mapping service, never on disk here.
//! Resolution is a single lookup followed by key decoding.

use anyhow::{Context, Result};
use sui_crypto::ed25519::Ed25519PrivateKey;
use sui_sdk_types as sui;
use tracing::debug;

use crate::identity::keypair::load_keypair;
use crate::types::MappingStore;

/// Resolve the signing key for a Role through the mapping service.
///
/// Errors when the role has no mapping record or the stored key is not a
/// valid ed25519 secret key.
pub async fn resolve_bot_signer(
    store: &dyn MappingStore,
    role_id: &str,
) -> Result<(sui::Address, Ed25519PrivateKey)> {
    if role_id.is_empty() {
        anyhow::bail!("Role ID is not set");
    }

    let raw_key = store
        .private_key(role_id)
        .await
        .with_context(|| format!("Failed to fetch private key for role {}", role_id))?;

    let (address, sk) = load_keypair(&raw_key)
        .context("Failed to initialize keypair from stored secret key")?;

    debug!("Resolved bot signer {} for role {}", address, role_id);
    Ok((address, sk))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NftMapping;
    use async_trait::async_trait;

    struct FixedStore {
        key: Option<String>,
    }

    #[async_trait]
    impl MappingStore for FixedStore {
        async fn generate_address(&self) -> Result<String> {
            unimplemented!()
        }
        async fn store_mapping(&self, _: &str, _: &str, _: &str) -> Result<()> {
            unimplemented!()
        }
        async fn list_mappings(&self) -> Result<Vec<NftMapping>> {
            unimplemented!()
        }
        async fn private_key(&self, _role_id: &str) -> Result<String> {
            self.key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("no mapping"))
        }
    }

    #[tokio::test]
    async fn test_resolve_with_valid_key() {
        let store = FixedStore {
            key: Some(
                "9bf49a6a0755f953811fce125f2683d50429c3bb49e074147e0089a52eae155f".to_string(),
            ),
        };
        let (address, _sk) = resolve_bot_signer(&store, "0xrole").await.unwrap();
        assert!(!address.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_rejects_empty_role() {
        let store = FixedStore { key: None };
        assert!(resolve_bot_signer(&store, "").await.is_err());
    }

    #[tokio::test]
    async fn test_resolve_propagates_missing_mapping() {
        let store = FixedStore { key: None };
        assert!(resolve_bot_signer(&store, "0xrole").await.is_err());
    }
}
