//! gRPC client and move-call execution.
//!
//! A [`CallSpec`] is lowered into a programmable transaction here: object
//! arguments are resolved to owned or shared inputs, pure values are BCS
//! serialized, and gas splits become `split_coins` off the gas coin. The
//! signed transaction is executed and its effects checked before the digest
//! is returned.

use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use sui_crypto::ed25519::Ed25519PrivateKey;
use sui_crypto::SuiSigner;
use sui_rpc::field::{FieldMask, FieldMaskUtil};
use sui_rpc::proto::sui::rpc::v2 as proto;
use sui_rpc::Client;
use sui_sdk_types as sui;
use sui_transaction_builder::{unresolved::Input, Function, Serialized, TransactionBuilder};
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use crate::chain::balance::pick_gas_coin;
use crate::error::ChainError;
use crate::sdk::call::{CallArg, CallSpec, PureArg};
use crate::types::Network;

/// Default gas budget per move call, in MIST.
pub const DEFAULT_GAS_BUDGET_MIST: u64 = 50_000_000;

const CLOCK_OBJECT_ID: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000006";

/// ServiceInfo does not expose the gas price; the network floor works.
const REFERENCE_GAS_PRICE_MIST: u64 = 1_000;

/// Move `0x1::string::String` for BCS serialization of pure string args.
#[derive(Serialize)]
struct MoveString {
    bytes: Vec<u8>,
}

/// An object created by a transaction, with its full Move type.
#[derive(Debug, Clone)]
pub struct CreatedObject {
    pub id: String,
    pub object_type: String,
}

impl CreatedObject {
    /// Whether the Move type ends with `suffix` (e.g. `::role_manager::Role`).
    pub fn type_ends_with(&self, suffix: &str) -> bool {
        self.object_type.ends_with(suffix)
    }
}

/// Outcome of a confirmed move call.
#[derive(Debug, Clone)]
pub struct ExecutedCall {
    pub digest: String,
    pub created: Vec<CreatedObject>,
}

/// Connection to a Sui fullnode over gRPC.
#[derive(Clone)]
pub struct SuiConnection {
    client: Client,
    network: Network,
    gas_budget: u64,
}

impl SuiConnection {
    pub fn new(network: Network, rpc_url: &str) -> Result<Self> {
        let client = Client::new(rpc_url.to_string())
            .map_err(|e| ChainError::RpcConnection(format!("{}: {}", rpc_url, e)))?;
        debug!("Connected to {} via {}", network, rpc_url);
        Ok(Self {
            client,
            network,
            gas_budget: DEFAULT_GAS_BUDGET_MIST,
        })
    }

    /// Override the per-call gas budget (MIST).
    pub fn with_gas_budget(mut self, budget: u64) -> Self {
        self.gas_budget = budget;
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// Explorer link for a digest on this connection's network.
    pub fn transaction_link(&self, digest: &str) -> String {
        self.network.transaction_link(digest)
    }

    /// Sign and execute a move call, wait for it to land in the ledger, and
    /// return the digest plus any created objects.
    pub async fn execute_call(
        &self,
        package_id: &str,
        spec: &CallSpec,
        sender: sui::Address,
        sk: &Ed25519PrivateKey,
    ) -> Result<ExecutedCall> {
        let target = spec.target(package_id);
        let package = parse_address(package_id).context("Invalid package ID")?;
        let mut client = self.client.clone();

        let mut tb = TransactionBuilder::new();
        tb.set_sender(sender);
        tb.set_gas_budget(self.gas_budget);
        tb.set_gas_price(REFERENCE_GAS_PRICE_MIST);

        // The gas coin funds the budget and every split taken from it.
        let required = self
            .gas_budget
            .checked_add(spec.gas_split_total())
            .ok_or_else(|| anyhow!("Gas requirement overflow for {}", target))?;
        let gas_coin = pick_gas_coin(&mut client, sender, required)
            .await?
            .ok_or_else(|| ChainError::InsufficientGas {
                address: sender.to_string(),
                required,
            })?;
        tb.add_gas_objects(vec![Input::owned(
            *gas_coin.object_id(),
            gas_coin.version(),
            *gas_coin.digest(),
        )]);

        let mut args = Vec::with_capacity(spec.args.len());
        for arg in &spec.args {
            let lowered = match arg {
                CallArg::Object(id) => {
                    let object_id = parse_address(id)
                        .with_context(|| format!("Invalid object ID '{}'", id))?;
                    let (object_ref, initial_shared_version) =
                        get_object_details(&mut client, object_id).await?;
                    let input = match initial_shared_version {
                        Some(shared_version) => {
                            Input::shared(object_id, shared_version, true)
                        }
                        None => Input::owned(
                            *object_ref.object_id(),
                            object_ref.version(),
                            *object_ref.digest(),
                        ),
                    };
                    tb.input(input)
                }
                CallArg::Clock => {
                    let clock = sui::Address::from_str(CLOCK_OBJECT_ID)
                        .map_err(|e| anyhow!("Clock object ID: {}", e))?;
                    tb.input(Input::shared(clock, 1, false))
                }
                CallArg::Pure(PureArg::U8(v)) => tb.input(Serialized(v)),
                CallArg::Pure(PureArg::U64(v)) => tb.input(Serialized(v)),
                CallArg::Pure(PureArg::Address(s)) | CallArg::Pure(PureArg::Id(s)) => {
                    let addr = parse_address(s)
                        .with_context(|| format!("Invalid address argument '{}'", s))?;
                    tb.input(Serialized(&addr))
                }
                CallArg::Pure(PureArg::Str(s)) => tb.input(Serialized(&MoveString {
                    bytes: s.clone().into_bytes(),
                })),
                CallArg::SplitFromGas(amount) => {
                    let amount_arg = tb.input(Serialized(amount));
                    let split = tb.split_coins(sui::Argument::Gas, vec![amount_arg]);
                    split
                        .nested(0)
                        .ok_or_else(|| anyhow!("split_coins returned no result"))?
                }
            };
            args.push(lowered);
        }

        let mut type_args = Vec::with_capacity(spec.type_args.len());
        for tag in &spec.type_args {
            let parsed = sui::TypeTag::from_str(tag)
                .map_err(|e| anyhow!("Invalid type argument '{}': {}", tag, e))?;
            type_args.push(parsed);
        }

        let function = Function::new(
            package,
            spec.module
                .parse()
                .map_err(|e| anyhow!("Invalid module name '{}': {}", spec.module, e))?,
            spec.function
                .parse()
                .map_err(|e| anyhow!("Invalid function name '{}': {}", spec.function, e))?,
            type_args,
        );
        tb.move_call(function, args);

        let tx = tb.finish()?;
        let sig = sk.sign_transaction(&tx)?;

        debug!("Executing {} with budget {} MIST", target, self.gas_budget);
        let mut exec = client.execution_client();
        let mut request = proto::ExecuteTransactionRequest::default();
        request.transaction = Some(tx.into());
        request.signatures = vec![sig.into()];
        request.read_mask = Some(FieldMask::from_paths([
            "transaction.digest",
            "transaction.effects",
        ]));
        let resp = exec
            .execute_transaction(request)
            .await
            .map_err(|e| ChainError::RpcConnection(clean_grpc_error(&e.to_string())))?
            .into_inner();

        check_transaction_effects(&resp, &target)?;

        let digest = resp
            .transaction
            .as_ref()
            .and_then(|t| t.digest.as_ref())
            .context("Missing transaction digest in response")?
            .to_string();

        let created = self.collect_created_objects(&resp).await;

        if let Err(e) = wait_for_transaction(&mut client, &digest, 5_000).await {
            // The transaction already executed; checkpointing lag is not fatal.
            warn!("Transaction {} confirmation wait failed: {}", digest, e);
        }

        debug!("{} executed: {}", target, digest);
        Ok(ExecutedCall { digest, created })
    }

    /// Created-object IDs from the effects, each resolved to its Move type.
    async fn collect_created_objects(
        &self,
        resp: &proto::ExecuteTransactionResponse,
    ) -> Vec<CreatedObject> {
        let mut created = Vec::new();
        let changed = resp
            .transaction
            .as_ref()
            .and_then(|t| t.effects.as_ref())
            .map(|e| e.changed_objects.as_slice())
            .unwrap_or_default();

        let mut client = self.client.clone();
        for change in changed {
            if change.id_operation != Some(proto::changed_object::IdOperation::Created as i32) {
                continue;
            }
            let Some(id) = change.object_id.clone() else {
                continue;
            };
            match get_object_type(&mut client, &id).await {
                Ok(object_type) => created.push(CreatedObject { id, object_type }),
                Err(e) => {
                    warn!("Could not resolve type of created object {}: {}", id, e);
                    created.push(CreatedObject {
                        id,
                        object_type: String::new(),
                    });
                }
            }
        }
        created
    }
}

/// Parse an ID or address string, tolerating a missing `0x` prefix.
pub fn parse_address(value: &str) -> Result<sui::Address> {
    let prefixed = if value.starts_with("0x") {
        value.to_string()
    } else {
        format!("0x{}", value)
    };
    sui::Address::from_str(&prefixed).map_err(|e| anyhow!("'{}': {}", value, e))
}

/// Resolve an object's current reference and, for shared objects, its
/// initial shared version. `owner.address` is unset for shared objects and
/// `owner.version` then carries the initial shared version.
pub async fn get_object_details(
    client: &mut Client,
    object_id: sui::Address,
) -> Result<(sui::ObjectReference, Option<u64>)> {
    let mut ledger = client.ledger_client();

    let mut request = proto::GetObjectRequest::default();
    request.object_id = Some(object_id.to_string());
    request.read_mask = Some(FieldMask::from_paths([
        "object_id",
        "version",
        "digest",
        "owner",
    ]));
    let response = ledger
        .get_object(request)
        .await
        .with_context(|| format!("Failed to fetch object {}", object_id))?
        .into_inner();

    let object = response
        .object
        .ok_or_else(|| ChainError::ObjectNotFound(object_id.to_string()))?;

    let id = object
        .object_id
        .context("Missing object_id")?
        .parse()
        .context("Failed to parse object_id")?;
    let version = object.version.context("Missing version")?;
    let digest = object
        .digest
        .context("Missing digest")?
        .parse()
        .context("Failed to parse digest")?;
    let object_ref = sui::ObjectReference::new(id, version, digest);

    let initial_shared_version = object.owner.and_then(|owner| {
        if owner.address.is_none() || owner.address.as_deref() == Some("") {
            owner.version
        } else {
            None
        }
    });

    Ok((object_ref, initial_shared_version))
}

/// Full Move type of an object.
pub async fn get_object_type(client: &mut Client, object_id: &str) -> Result<String> {
    let mut ledger = client.ledger_client();
    let mut request = proto::GetObjectRequest::default();
    request.object_id = Some(object_id.to_string());
    request.read_mask = Some(FieldMask::from_paths(["object_id", "object_type"]));
    let response = ledger
        .get_object(request)
        .await
        .with_context(|| format!("Failed to fetch object {}", object_id))?
        .into_inner();

    response
        .object
        .and_then(|o| o.object_type)
        .ok_or_else(|| ChainError::ObjectNotFound(object_id.to_string()).into())
}

/// Poll the ledger until the digest is queryable or `max_wait_ms` elapses.
async fn wait_for_transaction(client: &mut Client, digest: &str, max_wait_ms: u64) -> Result<()> {
    let start = std::time::Instant::now();
    let mut ledger = client.ledger_client();

    loop {
        if start.elapsed().as_millis() > max_wait_ms as u128 {
            return Err(anyhow!(
                "Timeout waiting for transaction {} after {}ms",
                digest,
                max_wait_ms
            ));
        }

        let mut request = proto::GetTransactionRequest::default();
        request.digest = Some(digest.to_string());
        request.read_mask = Some(FieldMask::from_paths(["digest"]));
        match ledger.get_transaction(request).await {
            Ok(_) => return Ok(()),
            Err(e) => debug!("Transaction {} not yet available: {}", digest, e),
        }

        sleep(Duration::from_millis(200)).await;
    }
}

/// Surface effects-level failures as [`ChainError::Transaction`], with Move
/// aborts condensed to their code and function.
fn check_transaction_effects(
    resp: &proto::ExecuteTransactionResponse,
    operation: &str,
) -> Result<()> {
    let tx_digest = resp
        .transaction
        .as_ref()
        .and_then(|t| t.digest.as_ref())
        .map(|d| d.to_string());

    let status = resp
        .transaction
        .as_ref()
        .and_then(|t| t.effects.as_ref())
        .and_then(|e| e.status.as_ref());

    match status {
        Some(status) => {
            if let Some(ref error) = status.error {
                let message = clean_move_error(&format!("{:?}", error));
                return Err(ChainError::Transaction {
                    message: format!("{}: {}", operation, message),
                    tx_digest,
                }
                .into());
            }
            Ok(())
        }
        None => Err(ChainError::Transaction {
            message: format!("{}: no effects status in response", operation),
            tx_digest,
        }
        .into()),
    }
}

/// Condense a debug-formatted effects error into something readable.
fn clean_move_error(error_str: &str) -> String {
    if !error_str.contains("MoveAbort") {
        return error_str.to_string();
    }

    let mut parts = Vec::new();
    if let Some(start) = error_str.find("abort_code: Some(") {
        let code_start = start + "abort_code: Some(".len();
        if let Some(end) = error_str[code_start..].find(')') {
            parts.push(format!(
                "abort_code: {}",
                &error_str[code_start..code_start + end]
            ));
        }
    }
    if let Some(start) = error_str.find("function_name: Some(\"") {
        let name_start = start + "function_name: Some(\"".len();
        if let Some(end) = error_str[name_start..].find('"') {
            parts.push(format!(
                "function: {}",
                &error_str[name_start..name_start + end]
            ));
        }
    }

    if parts.is_empty() {
        "Move execution aborted".to_string()
    } else {
        format!("MoveAbort: {}", parts.join(", "))
    }
}

/// Strip the binary details tail that tonic appends to status messages.
fn clean_grpc_error(error_str: &str) -> String {
    match error_str.find(", details: [") {
        Some(idx) => error_str[..idx].to_string(),
        None => error_str.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_accepts_both_prefixes() {
        let a = parse_address("0x6").unwrap();
        let b = parse_address("6").unwrap();
        assert_eq!(a, b);
        assert!(parse_address("not-an-address").is_err());
    }

    #[test]
    fn test_clean_move_error_extracts_abort() {
        let raw = "MoveAbort(MoveLocation { module: ModuleId { .. }, function_name: Some(\"withdraw_sui_as_bot\") }, abort_code: Some(3))";
        let cleaned = clean_move_error(raw);
        assert!(cleaned.contains("abort_code: 3"));
        assert!(cleaned.contains("function: withdraw_sui_as_bot"));
    }

    #[test]
    fn test_clean_move_error_passthrough() {
        assert_eq!(clean_move_error("InsufficientGas"), "InsufficientGas");
        assert_eq!(clean_move_error("MoveAbort garbage"), "Move execution aborted");
    }

    #[test]
    fn test_clean_grpc_error_strips_details() {
        let raw = "status: Internal, message: \"boom\", details: [1, 2, 3]";
        assert_eq!(clean_grpc_error(raw), "status: Internal, message: \"boom\"");
        assert_eq!(clean_grpc_error("plain"), "plain");
    }
}
