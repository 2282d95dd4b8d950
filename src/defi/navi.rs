//! Navi deposit and withdraw flows.
//!
//! The Navi entry points are ordinary move calls against the protocol's
//! shared objects, so they lower through the same [`CallSpec`] path as the
//! role builders. Mutating flows are mainnet only.
//!
//! [`CallSpec`]: crate::sdk::CallSpec

use anyhow::{bail, Context, Result};
use sui_crypto::ed25519::Ed25519PrivateKey;
use sui_sdk_types as sui;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::chain::{get_sui_balance, wait_for_balance, SuiConnection};
use crate::sdk::call::{CallSpec, PureArg};
use crate::sdk::RoleManager;
use crate::tokens::{mist_to_sui_string, SUI_COIN_TYPE};
use crate::types::{NaviObjects, Network, TxResult};

/// Attempts when waiting for withdrawn funds to land in the wallet.
const WITHDRAW_WAIT_ATTEMPTS: u32 = 10;
const WITHDRAW_WAIT_INTERVAL: Duration = Duration::from_secs(1);

pub struct NaviService {
    connection: SuiConnection,
    navi: NaviObjects,
    /// Package the Role contracts live in, for the post-withdraw deposit.
    role_package_id: String,
    role_manager: RoleManager,
}

impl NaviService {
    pub fn new(connection: SuiConnection, navi: NaviObjects, role_package_id: String) -> Self {
        Self {
            connection,
            navi,
            role_package_id,
            role_manager: RoleManager::new(),
        }
    }

    pub fn network(&self) -> Network {
        self.connection.network()
    }

    pub fn transaction_link(&self, digest: &str) -> String {
        self.connection.transaction_link(digest)
    }

    /// Lending mutations run against mainnet pool objects only.
    fn ensure_ready(&self) -> Result<()> {
        if self.connection.network() != Network::Mainnet {
            bail!("Navi operations are only available on mainnet");
        }
        if !self.navi.is_configured() {
            bail!("Navi pool objects are not configured; run setup first");
        }
        Ok(())
    }

    /// Supply `amount_mist` MIST of SUI to the Navi pool.
    pub async fn deposit_sui(
        &self,
        amount_mist: u64,
        sender: sui::Address,
        sk: &Ed25519PrivateKey,
    ) -> TxResult {
        if let Err(e) = self.ensure_ready() {
            return TxResult::failed(e.to_string());
        }

        let spec = deposit_call(&self.navi, amount_mist);
        match self
            .connection
            .execute_call(&self.navi.package_id, &spec, sender, sk)
            .await
        {
            Ok(executed) => {
                info!(
                    "Deposited {} SUI to Navi: {}",
                    mist_to_sui_string(amount_mist, 4),
                    executed.digest
                );
                TxResult::ok(executed.digest, "Deposit successful")
            }
            Err(e) => {
                warn!("Navi deposit failed: {:#}", e);
                TxResult::failed(format!("{:#}", e))
            }
        }
    }

    /// Withdraw `amount_mist` from Navi, wait for the freed SUI to land in
    /// the wallet, then deposit it into the Role.
    pub async fn withdraw_to_role(
        &self,
        amount_mist: u64,
        role_id: &str,
        sender: sui::Address,
        sk: &Ed25519PrivateKey,
    ) -> TxResult {
        if let Err(e) = self.ensure_ready() {
            return TxResult::failed(e.to_string());
        }

        let withdraw = withdraw_call(&self.navi, amount_mist);
        let withdrawn = match self
            .connection
            .execute_call(&self.navi.package_id, &withdraw, sender, sk)
            .await
        {
            Ok(executed) => executed,
            Err(e) => {
                warn!("Navi withdraw failed: {:#}", e);
                return TxResult::failed(format!("{:#}", e));
            }
        };
        info!("Withdrew from Navi: {}", withdrawn.digest);

        // The withdrawn coin has to be spendable before it can fund the role
        // deposit.
        let client = self.connection.client();
        let funded = wait_for_balance(
            amount_mist,
            WITHDRAW_WAIT_ATTEMPTS,
            WITHDRAW_WAIT_INTERVAL,
            move || {
                let mut client = client.clone();
                async move { get_sui_balance(&mut client, sender).await }
            },
        )
        .await;
        if let Err(e) = funded {
            return TxResult::failed(format!(
                "Withdrawn funds did not arrive in wallet: {}",
                e
            ));
        }

        let deposit = self.role_manager.deposit_sui(role_id, amount_mist);
        match self
            .connection
            .execute_call(&self.role_package_id, &deposit, sender, sk)
            .await
        {
            Ok(executed) => {
                info!(
                    "Deposited {} SUI into role {}: {}",
                    mist_to_sui_string(amount_mist, 4),
                    role_id,
                    executed.digest
                );
                TxResult::ok(executed.digest, "Withdraw and role deposit successful")
            }
            Err(e) => {
                warn!("Role deposit after withdraw failed: {:#}", e);
                TxResult::failed(format!(
                    "Withdrawn from Navi ({}) but role deposit failed: {:#}",
                    withdrawn.digest, e
                ))
            }
        }
    }

    /// Balance currently held by the signing wallet, in MIST.
    pub async fn wallet_balance(&self, address: sui::Address) -> Result<u64> {
        let mut client = self.connection.client();
        get_sui_balance(&mut client, address)
            .await
            .context("Failed to query wallet balance")
    }
}

fn deposit_call(navi: &NaviObjects, amount_mist: u64) -> CallSpec {
    CallSpec::new("incentive_v2", "entry_deposit")
        .type_arg(SUI_COIN_TYPE)
        .clock()
        .object(&navi.storage_id)
        .object(&navi.sui_pool_id)
        .pure(PureArg::U8(navi.sui_asset_id))
        .split_from_gas(amount_mist)
        .pure(PureArg::U64(amount_mist))
        .object(&navi.incentive_v1_id)
        .object(&navi.incentive_v2_id)
}

fn withdraw_call(navi: &NaviObjects, amount_mist: u64) -> CallSpec {
    CallSpec::new("incentive_v2", "entry_withdraw")
        .type_arg(SUI_COIN_TYPE)
        .clock()
        .object(&navi.oracle_id)
        .object(&navi.storage_id)
        .object(&navi.sui_pool_id)
        .pure(PureArg::U8(navi.sui_asset_id))
        .pure(PureArg::U64(amount_mist))
        .object(&navi.incentive_v1_id)
        .object(&navi.incentive_v2_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::call::CallArg;

    fn navi_objects() -> NaviObjects {
        NaviObjects {
            package_id: "0xnav1".into(),
            storage_id: "0xst0r".into(),
            sui_pool_id: "0xp001".into(),
            oracle_id: "0x0rac".into(),
            incentive_v1_id: "0x1nc1".into(),
            incentive_v2_id: "0x1nc2".into(),
            sui_asset_id: 0,
            open_api_url: "https://open-api.naviprotocol.io/api".into(),
        }
    }

    #[test]
    fn test_deposit_call_shape() {
        let spec = deposit_call(&navi_objects(), 2_000_000_000);
        assert_eq!(spec.target("0xnav1"), "0xnav1::incentive_v2::entry_deposit");
        assert_eq!(spec.type_args, vec![SUI_COIN_TYPE.to_string()]);
        assert_eq!(spec.args.len(), 8);
        assert_eq!(spec.args[0], CallArg::Clock);
        assert_eq!(spec.args[1], CallArg::Object("0xst0r".into()));
        assert_eq!(spec.args[3], CallArg::Pure(PureArg::U8(0)));
        assert_eq!(spec.args[4], CallArg::SplitFromGas(2_000_000_000));
        assert_eq!(spec.args[5], CallArg::Pure(PureArg::U64(2_000_000_000)));
        assert_eq!(spec.gas_split_total(), 2_000_000_000);
    }

    #[test]
    fn test_withdraw_call_shape() {
        let spec = withdraw_call(&navi_objects(), 500);
        assert_eq!(spec.function, "entry_withdraw");
        assert_eq!(spec.args.len(), 8);
        assert_eq!(spec.args[1], CallArg::Object("0x0rac".into()));
        assert_eq!(spec.args[5], CallArg::Pure(PureArg::U64(500)));
        assert_eq!(spec.args[7], CallArg::Object("0x1nc2".into()));
        // Withdraw takes no coin; nothing splits off gas.
        assert_eq!(spec.gas_split_total(), 0);
    }

    #[tokio::test]
    async fn test_mutations_refuse_off_mainnet() {
        let connection = SuiConnection::new(
            Network::Testnet,
            &Network::Testnet.default_rpc_url(),
        )
        .unwrap();
        let svc = NaviService::new(connection, navi_objects(), "0xr".into());

        let sk = Ed25519PrivateKey::new([7u8; 32]);
        let sender = crate::identity::keypair::derive_address(&[7u8; 32]);

        let result = svc.deposit_sui(1, sender, &sk).await;
        assert!(!result.success);
        assert!(result.message.contains("mainnet"));
    }

    #[tokio::test]
    async fn test_mutations_refuse_unconfigured_pools() {
        let connection = SuiConnection::new(
            Network::Mainnet,
            &Network::Mainnet.default_rpc_url(),
        )
        .unwrap();
        let svc = NaviService::new(connection, NaviObjects::default(), "0xr".into());

        let sk = Ed25519PrivateKey::new([7u8; 32]);
        let sender = crate::identity::keypair::derive_address(&[7u8; 32]);

        let result = svc.withdraw_to_role(1, "0xrole", sender, &sk).await;
        assert!(!result.success);
        assert!(result.message.contains("configured"));
    }
}
