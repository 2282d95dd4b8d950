//! Action definitions and dispatch.
//!
//! Each action validates its payload structurally before doing work; a
//! malformed payload produces a user-facing error text, never a panic.
//! Results carry the explorer link on success and the failure message
//! otherwise.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use sui_crypto::ed25519::Ed25519PrivateKey;
use sui_sdk_types as sui;
use tracing::{info, warn};

use crate::chain::SuiConnection;
use crate::defi::{format_portfolio, NaviApiClient, NaviService};
use crate::identity::resolver::resolve_bot_signer;
use crate::sdk::RoleManager;
use crate::tokens::sui_to_mist;
use crate::types::MappingStore;

/// An action the agent runtime can invoke, with its JSON-schema parameters.
#[derive(Debug, Clone)]
pub struct AgentAction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Outcome shown back to the conversation.
#[derive(Debug, Clone)]
pub struct ActionResult {
    pub success: bool,
    pub text: String,
}

impl ActionResult {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: text.into(),
        }
    }

    fn failed(text: impl Into<String>) -> Self {
        Self {
            success: false,
            text: text.into(),
        }
    }
}

/// Everything an action needs: the connection, the Navi services, and the
/// signer acting for the Role.
pub struct ActionContext {
    pub connection: SuiConnection,
    pub navi: NaviService,
    pub navi_api: NaviApiClient,
    pub role_manager: RoleManager,
    pub package_id: String,
    pub signer_address: sui::Address,
    pub signer_key: Ed25519PrivateKey,
}

impl ActionContext {
    /// Build a context whose signer is the bot behind `role_id`, resolved
    /// through the mapping service.
    pub async fn for_role(
        store: &dyn MappingStore,
        role_id: &str,
        connection: SuiConnection,
        navi: NaviService,
        navi_api: NaviApiClient,
        package_id: String,
    ) -> Result<Self> {
        let (signer_address, signer_key) = resolve_bot_signer(store, role_id)
            .await
            .with_context(|| format!("Failed to resolve signer for role {}", role_id))?;
        Ok(Self {
            connection,
            navi,
            navi_api,
            role_manager: RoleManager::new(),
            package_id,
            signer_address,
            signer_key,
        })
    }
}

/// All actions the runtime exposes.
pub fn create_actions() -> Vec<AgentAction> {
    vec![
        AgentAction {
            name: "deposit_to_navi".to_string(),
            description: "Deposit SUI tokens into the Navi lending protocol.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "amount": {
                        "type": ["string", "number"],
                        "description": "Amount of SUI to deposit"
                    }
                },
                "required": ["amount"]
            }),
        },
        AgentAction {
            name: "withdraw_from_navi".to_string(),
            description: "Withdraw SUI from Navi and deposit it into the role.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "amount": {
                        "type": ["string", "number"],
                        "description": "Amount of SUI to withdraw"
                    },
                    "role_id": {
                        "type": "string",
                        "description": "Role object ID receiving the funds"
                    }
                },
                "required": ["amount", "role_id"]
            }),
        },
        AgentAction {
            name: "get_navi_portfolio".to_string(),
            description: "Show the signer's Navi portfolio: positions, pool stats, rewards, and health factor.".to_string(),
            parameters: json!({ "type": "object", "properties": {} }),
        },
        AgentAction {
            name: "update_role_health".to_string(),
            description: "Refresh the role's health counter (bot signer only).".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "role_id": { "type": "string", "description": "Role object ID" }
                },
                "required": ["role_id"]
            }),
        },
        AgentAction {
            name: "withdraw_sui_as_bot".to_string(),
            description: "Withdraw SUI from the role to the bot wallet.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "amount": {
                        "type": ["string", "number"],
                        "description": "Amount of SUI to withdraw"
                    },
                    "role_id": { "type": "string", "description": "Role object ID" }
                },
                "required": ["amount", "role_id"]
            }),
        },
    ]
}

/// Amount payloads arrive as either a JSON string or a number; reject
/// anything else before touching arithmetic.
fn payload_amount_mist(payload: &Value) -> Result<u64, String> {
    let raw = match payload.get("amount") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err("Invalid payload: 'amount' must be a string or number".to_string()),
    };
    sui_to_mist(&raw).map_err(|e| format!("Invalid amount '{}': {}", raw, e))
}

fn payload_role_id(payload: &Value) -> Result<String, String> {
    match payload.get("role_id") {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err("Invalid payload: 'role_id' must be a non-empty string".to_string()),
    }
}

/// Run an action by name. Unknown names and malformed payloads come back as
/// failed results with a message, matching how replies reach the user.
pub async fn dispatch(action: &str, payload: &Value, ctx: &ActionContext) -> ActionResult {
    info!("Dispatching agent action {}", action);
    match action {
        "deposit_to_navi" => {
            let amount_mist = match payload_amount_mist(payload) {
                Ok(v) => v,
                Err(e) => return ActionResult::failed(e),
            };
            let result = ctx
                .navi
                .deposit_sui(amount_mist, ctx.signer_address, &ctx.signer_key)
                .await;
            if result.success {
                ActionResult::ok(format!(
                    "Successfully deposited to Navi, Transaction: {}",
                    ctx.connection.transaction_link(&result.tx)
                ))
            } else {
                ActionResult::failed(format!("Failed to deposit: {}", result.message))
            }
        }
        "withdraw_from_navi" => {
            let amount_mist = match payload_amount_mist(payload) {
                Ok(v) => v,
                Err(e) => return ActionResult::failed(e),
            };
            let role_id = match payload_role_id(payload) {
                Ok(v) => v,
                Err(e) => return ActionResult::failed(e),
            };
            let result = ctx
                .navi
                .withdraw_to_role(amount_mist, &role_id, ctx.signer_address, &ctx.signer_key)
                .await;
            if result.success {
                ActionResult::ok(format!(
                    "Successfully withdrew from Navi, Transaction: {}",
                    ctx.connection.transaction_link(&result.tx)
                ))
            } else {
                ActionResult::failed(format!("Failed to withdraw: {}", result.message))
            }
        }
        "get_navi_portfolio" => {
            match ctx
                .navi_api
                .portfolio(&ctx.signer_address.to_string())
                .await
            {
                Ok(info) => ActionResult::ok(format_portfolio(&info)),
                Err(e) => {
                    warn!("Portfolio query failed: {:#}", e);
                    ActionResult::failed(format!("Error fetching Navi portfolio: {:#}", e))
                }
            }
        }
        "update_role_health" => {
            let role_id = match payload_role_id(payload) {
                Ok(v) => v,
                Err(e) => return ActionResult::failed(e),
            };
            let spec = ctx.role_manager.update_role_health(&role_id);
            match ctx
                .connection
                .execute_call(&ctx.package_id, &spec, ctx.signer_address, &ctx.signer_key)
                .await
            {
                Ok(executed) => ActionResult::ok(format!(
                    "Role health updated, Transaction: {}",
                    ctx.connection.transaction_link(&executed.digest)
                )),
                Err(e) => ActionResult::failed(format!("Failed to update role health: {:#}", e)),
            }
        }
        "withdraw_sui_as_bot" => {
            let amount_mist = match payload_amount_mist(payload) {
                Ok(v) => v,
                Err(e) => return ActionResult::failed(e),
            };
            let role_id = match payload_role_id(payload) {
                Ok(v) => v,
                Err(e) => return ActionResult::failed(e),
            };
            let spec = ctx.role_manager.withdraw_sui_as_bot(&role_id, amount_mist);
            match ctx
                .connection
                .execute_call(&ctx.package_id, &spec, ctx.signer_address, &ctx.signer_key)
                .await
            {
                Ok(executed) => ActionResult::ok(format!(
                    "Successfully withdrew from role, Transaction: {}",
                    ctx.connection.transaction_link(&executed.digest)
                )),
                Err(e) => ActionResult::failed(format!("Failed to withdraw: {:#}", e)),
            }
        }
        other => ActionResult::failed(format!("Unknown action: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_actions_have_schemas() {
        let actions = create_actions();
        assert_eq!(actions.len(), 5);
        for action in &actions {
            assert!(action.parameters["type"] == "object");
        }
        let withdraw = actions
            .iter()
            .find(|a| a.name == "withdraw_from_navi")
            .unwrap();
        let required = withdraw.parameters["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "amount"));
        assert!(required.iter().any(|v| v == "role_id"));
    }

    #[test]
    fn test_payload_amount_accepts_string_and_number() {
        assert_eq!(
            payload_amount_mist(&json!({ "amount": "1.5" })).unwrap(),
            1_500_000_000
        );
        assert_eq!(
            payload_amount_mist(&json!({ "amount": 2 })).unwrap(),
            2_000_000_000
        );
        assert!(payload_amount_mist(&json!({ "amount": true })).is_err());
        assert!(payload_amount_mist(&json!({})).is_err());
        assert!(payload_amount_mist(&json!({ "amount": "lots" })).is_err());
    }

    #[test]
    fn test_payload_role_id_requires_string() {
        assert_eq!(
            payload_role_id(&json!({ "role_id": "0xr" })).unwrap(),
            "0xr"
        );
        assert!(payload_role_id(&json!({ "role_id": "" })).is_err());
        assert!(payload_role_id(&json!({ "role_id": 9 })).is_err());
        assert!(payload_role_id(&json!({})).is_err());
    }
}
