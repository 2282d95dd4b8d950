//! NFT mapping service client.
//!
//! The mapping service custodies bot signing keys: it generates fresh bot
//! addresses, records which Role and BotNFT each address belongs to, and
//! serves the key back for a given role. The HTTP implementation lives here;
//! [`MappingStore`] is the seam tests stub out.

pub mod relay;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::types::{MappingStore, NftMapping};

/// HTTP client for the mapping service.
pub struct MappingHttpClient {
    pub base_url: String,
    http: Client,
}

impl MappingHttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let mut builder = match method {
            "POST" => self.http.post(&url),
            _ => self.http.get(&url),
        };
        builder = builder.header("Content-Type", "application/json");
        if let Some(b) = body {
            builder = builder.json(&b);
        }

        let resp = builder
            .send()
            .await
            .with_context(|| format!("Mapping service request failed: {} {}", method, path))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            // Servers report failures as {"message": ...} JSON; fall back to
            // the raw body.
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v["message"].as_str().map(str::to_string))
                .unwrap_or(text);
            anyhow::bail!(
                "Mapping service error: {} {} -> {}: {}",
                method,
                path,
                status.as_u16(),
                message
            );
        }

        resp.json().await.context("Mapping service returned non-JSON body")
    }
}

#[async_trait]
impl MappingStore for MappingHttpClient {
    async fn generate_address(&self) -> Result<String> {
        let result = self.request("POST", "/generate-address", None).await?;
        let address = result["address"]
            .as_str()
            .context("generate-address response missing 'address'")?
            .to_string();
        debug!("Mapping service generated address {}", address);
        Ok(address)
    }

    async fn store_mapping(&self, address: &str, nft_id: &str, role_id: &str) -> Result<()> {
        let body = serde_json::json!({
            "address": address,
            "nft_id": nft_id,
            "role_id": role_id,
        });
        self.request("POST", "/store-nft-mapping", Some(body))
            .await?;
        debug!("Stored mapping for role {}", role_id);
        Ok(())
    }

    async fn list_mappings(&self) -> Result<Vec<NftMapping>> {
        let result = self.request("GET", "/nft-mappings", None).await?;
        if !result["success"].as_bool().unwrap_or(false) {
            anyhow::bail!("Mapping service reported failure listing mappings");
        }
        let mappings = result["mappings"].clone();
        serde_json::from_value(mappings).context("Malformed mappings list")
    }

    async fn private_key(&self, role_id: &str) -> Result<String> {
        let encoded = urlencoding::encode(role_id);
        let result = self
            .request("GET", &format!("/nft-mapping/private-key/{}", encoded), None)
            .await?;

        if !result["success"].as_bool().unwrap_or(false) {
            anyhow::bail!("Mapping service has no key for role {}", role_id);
        }
        result["private_key"]
            .as_str()
            .map(str::to_string)
            .with_context(|| format!("Mapping service returned no key for role {}", role_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let client = MappingHttpClient::new("https://mappings.example/");
        assert_eq!(client.base_url, "https://mappings.example");
    }

    #[test]
    fn test_mapping_list_deserializes() {
        let raw = serde_json::json!([
            {
                "id": 7,
                "role_id": "0xr",
                "nft_id": "0xn",
                "address": "0xb07",
                "created_at": "2025-01-01T00:00:00Z"
            },
            { "role_id": "0xr2", "nft_id": "0xn2", "address": "0xb072" }
        ]);
        let mappings: Vec<NftMapping> = serde_json::from_value(raw).unwrap();
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0].id, Some(7));
        assert_eq!(mappings[1].id, None);
        assert_eq!(mappings[1].created_at, "");
    }
}
