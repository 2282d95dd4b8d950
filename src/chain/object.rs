//! Typed reads of on-chain objects through the proto JSON view.

use anyhow::{Context, Result};
use serde_json::Value;
use sui_rpc::field::{FieldMask, FieldMaskUtil};
use sui_rpc::proto::sui::rpc::v2 as proto;
use sui_rpc::Client;
use tracing::debug;

use crate::chain::parse::{get_bool, get_string, get_string_vec, get_u64, proto_to_json};
use crate::error::ChainError;
use crate::types::{BotNftInfo, RoleInfo, SkillInfo};

/// Fetch an object's Move contents as JSON.
pub async fn fetch_object_json(client: &mut Client, object_id: &str) -> Result<Value> {
    let formatted_id = if object_id.starts_with("0x") {
        object_id.to_string()
    } else {
        format!("0x{}", object_id)
    };
    debug!("Fetching object {}", formatted_id);

    let mut request = proto::GetObjectRequest::default();
    request.object_id = Some(formatted_id.clone());
    request.read_mask = Some(FieldMask::from_paths(["json", "object_id"]));
    let response = client
        .ledger_client()
        .get_object(request)
        .await
        .map_err(|e| ChainError::RpcConnection(e.to_string()))?
        .into_inner();

    let object = response
        .object
        .ok_or_else(|| ChainError::ObjectNotFound(formatted_id.clone()))?;
    let json = object
        .json
        .as_deref()
        .map(proto_to_json)
        .ok_or_else(|| ChainError::InvalidObjectFormat(formatted_id))?;
    Ok(json)
}

/// Read a Role object into [`RoleInfo`].
pub async fn get_role_info(client: &mut Client, role_id: &str) -> Result<RoleInfo> {
    let json = fetch_object_json(client, role_id)
        .await
        .with_context(|| format!("Failed to read role {}", role_id))?;
    Ok(role_from_json(role_id, &json))
}

/// Read a BotNFT object into [`BotNftInfo`].
pub async fn get_bot_nft_info(client: &mut Client, nft_id: &str) -> Result<BotNftInfo> {
    let json = fetch_object_json(client, nft_id)
        .await
        .with_context(|| format!("Failed to read bot NFT {}", nft_id))?;
    Ok(nft_from_json(nft_id, &json))
}

/// Read a Skill object into [`SkillInfo`].
pub async fn get_skill_info(client: &mut Client, skill_id: &str) -> Result<SkillInfo> {
    let json = fetch_object_json(client, skill_id)
        .await
        .with_context(|| format!("Failed to read skill {}", skill_id))?;
    Ok(skill_from_json(skill_id, &json))
}

fn role_from_json(role_id: &str, json: &Value) -> RoleInfo {
    RoleInfo {
        id: role_id.to_string(),
        balance: get_u64(json, "balance"),
        is_active: get_bool(json, "is_active"),
        is_locked: get_bool(json, "is_locked"),
        health: get_u64(json, "health"),
        skills: get_string_vec(json, "skills"),
        bot_address: get_string(json, "bot_address"),
    }
}

fn nft_from_json(nft_id: &str, json: &Value) -> BotNftInfo {
    BotNftInfo {
        id: nft_id.to_string(),
        name: get_string(json, "name"),
        description: get_string(json, "description"),
        url: get_string(json, "url"),
    }
}

fn skill_from_json(skill_id: &str, json: &Value) -> SkillInfo {
    SkillInfo {
        id: skill_id.to_string(),
        name: get_string(json, "name"),
        description: get_string(json, "description"),
        doc: get_string(json, "doc"),
        fee: get_u64(json, "fee"),
        is_enabled: get_bool(json, "is_enabled"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_from_json() {
        let json = json!({
            "balance": "2500000000",
            "is_active": true,
            "is_locked": false,
            "health": "96",
            "skills": ["0xaaa", "0xbbb"],
            "bot_address": "0xb07",
        });
        let role = role_from_json("0xr01e", &json);
        assert_eq!(role.id, "0xr01e");
        assert_eq!(role.balance, 2_500_000_000);
        assert!(role.is_active);
        assert!(!role.is_locked);
        assert_eq!(role.health, 96);
        assert_eq!(role.skills, vec!["0xaaa", "0xbbb"]);
        assert_eq!(role.bot_address, "0xb07");
    }

    #[test]
    fn test_role_from_partial_json() {
        let role = role_from_json("0xr", &json!({ "balance": "7" }));
        assert_eq!(role.balance, 7);
        assert!(!role.is_active);
        assert!(role.skills.is_empty());
        assert_eq!(role.bot_address, "");
    }

    #[test]
    fn test_nft_and_skill_from_json() {
        let nft = nft_from_json(
            "0xn",
            &json!({ "name": "REX", "description": "agent", "url": "https://x/a.png" }),
        );
        assert_eq!(nft.name, "REX");
        assert_eq!(nft.url, "https://x/a.png");

        let skill = skill_from_json(
            "0xs",
            &json!({ "name": "search", "doc": "POST /q", "fee": "1000000", "is_enabled": true }),
        );
        assert_eq!(skill.fee, 1_000_000);
        assert!(skill.is_enabled);
        assert_eq!(skill.description, "");
    }
}
