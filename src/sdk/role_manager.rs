//! Role move-call builders.
//!
//! One builder per entry function of the on-chain `role_manager` module.
//! Argument order mirrors the Move signatures exactly; amounts are in MIST.

use crate::sdk::call::{CallSpec, PureArg};

const MODULE: &str = "role_manager";

#[derive(Debug, Default)]
pub struct RoleManager;

impl RoleManager {
    pub fn new() -> Self {
        Self
    }

    /// Create a new Role funded with `sui_amount` MIST split off the gas
    /// coin. `mint_cap_id` is the shared MintCap object.
    pub fn create_role(
        &self,
        bot_address: &str,
        mint_cap_id: &str,
        name: &str,
        description: &str,
        img_url: &str,
        sui_amount: u64,
    ) -> CallSpec {
        CallSpec::new(MODULE, "create_role")
            .pure(PureArg::Address(bot_address.to_string()))
            .object(mint_cap_id)
            .pure(PureArg::Str(name.to_string()))
            .pure(PureArg::Str(description.to_string()))
            .pure(PureArg::Str(img_url.to_string()))
            .split_from_gas(sui_amount)
    }

    /// Deposit SUI to maintain or restore the Role's health.
    pub fn deposit_sui(&self, role_id: &str, sui_amount: u64) -> CallSpec {
        CallSpec::new(MODULE, "deposit_sui")
            .object(role_id)
            .split_from_gas(sui_amount)
    }

    /// Update the Role's health counter (bot address only).
    pub fn update_role_health(&self, role_id: &str) -> CallSpec {
        CallSpec::new(MODULE, "update_role_health").object(role_id)
    }

    /// Activate a Role, proving control with its BotNFT.
    pub fn activate_role(&self, role_id: &str, bot_nft_id: &str) -> CallSpec {
        CallSpec::new(MODULE, "activate_role")
            .object(role_id)
            .object(bot_nft_id)
    }

    /// Toggle the Role's lock status.
    pub fn toggle_lock(&self, role_id: &str, bot_nft_id: &str) -> CallSpec {
        CallSpec::new(MODULE, "toggle_lock")
            .object(role_id)
            .object(bot_nft_id)
    }

    /// Attach a Skill to the Role.
    pub fn add_skill(&self, role_id: &str, bot_nft_id: &str, skill_id: &str) -> CallSpec {
        CallSpec::new(MODULE, "add_skill")
            .object(role_id)
            .object(bot_nft_id)
            .object(skill_id)
    }

    /// Detach a Skill from the Role. The skill travels as a pure ID, not an
    /// object reference.
    pub fn remove_skill(&self, role_id: &str, bot_nft_id: &str, skill_id: &str) -> CallSpec {
        CallSpec::new(MODULE, "remove_skill")
            .object(role_id)
            .object(bot_nft_id)
            .pure(PureArg::Id(skill_id.to_string()))
    }

    /// Withdraw SUI with BotNFT ownership verification.
    pub fn withdraw_sui_with_nft(
        &self,
        role_id: &str,
        bot_nft_id: &str,
        amount: u64,
    ) -> CallSpec {
        CallSpec::new(MODULE, "withdraw_sui_with_nft")
            .object(role_id)
            .object(bot_nft_id)
            .pure(PureArg::U64(amount))
    }

    /// Withdraw SUI with bot address verification (the sender must be the
    /// role's bot address).
    pub fn withdraw_sui_as_bot(&self, role_id: &str, amount: u64) -> CallSpec {
        CallSpec::new(MODULE, "withdraw_sui_as_bot")
            .object(role_id)
            .pure(PureArg::U64(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::call::CallArg;

    const ROLE: &str = "0x2dffae45e0abba83e3364b2153c8356c4bc1215bf2b53b3b38fab2b6e9ee40dd";
    const NFT: &str = "0x044d9784dd5f1432cc976306580c088ed3641cfbffddfeaeb00439f9e292b9d9";
    const SKILL: &str = "0x51e883ba7c0b566a26cbc8a94cd33eb0abd418a77cc1e60ad22fd9b1f29cd2ab";

    #[test]
    fn test_create_role_shape() {
        let spec = RoleManager::new().create_role(
            "0xb07",
            "0xcap",
            "REX",
            "Description",
            "https://example.com/a.png",
            100_000_000,
        );
        assert_eq!(spec.target("0xpkg"), "0xpkg::role_manager::create_role");
        assert_eq!(spec.args.len(), 6);
        assert_eq!(spec.args[0], CallArg::Pure(PureArg::Address("0xb07".into())));
        assert_eq!(spec.args[1], CallArg::Object("0xcap".into()));
        assert_eq!(spec.args[2], CallArg::Pure(PureArg::Str("REX".into())));
        assert_eq!(spec.args[5], CallArg::SplitFromGas(100_000_000));
        assert_eq!(spec.gas_split_total(), 100_000_000);
    }

    #[test]
    fn test_deposit_sui_shape() {
        let spec = RoleManager::new().deposit_sui(ROLE, 500_000_000);
        assert_eq!(spec.function, "deposit_sui");
        assert_eq!(
            spec.args,
            vec![
                CallArg::Object(ROLE.into()),
                CallArg::SplitFromGas(500_000_000),
            ]
        );
    }

    #[test]
    fn test_single_object_builders() {
        let mgr = RoleManager::new();
        let health = mgr.update_role_health(ROLE);
        assert_eq!(health.function, "update_role_health");
        assert_eq!(health.args, vec![CallArg::Object(ROLE.into())]);

        let activate = mgr.activate_role(ROLE, NFT);
        assert_eq!(activate.function, "activate_role");
        assert_eq!(activate.args.len(), 2);

        let lock = mgr.toggle_lock(ROLE, NFT);
        assert_eq!(lock.function, "toggle_lock");
        assert_eq!(
            lock.args,
            vec![CallArg::Object(ROLE.into()), CallArg::Object(NFT.into())]
        );
    }

    #[test]
    fn test_add_skill_uses_object_remove_skill_uses_pure_id() {
        let mgr = RoleManager::new();
        let add = mgr.add_skill(ROLE, NFT, SKILL);
        assert_eq!(add.args[2], CallArg::Object(SKILL.into()));

        let remove = mgr.remove_skill(ROLE, NFT, SKILL);
        assert_eq!(remove.args[2], CallArg::Pure(PureArg::Id(SKILL.into())));
    }

    #[test]
    fn test_withdraw_builders() {
        let mgr = RoleManager::new();
        let with_nft = mgr.withdraw_sui_with_nft(ROLE, NFT, 42);
        assert_eq!(with_nft.function, "withdraw_sui_with_nft");
        assert_eq!(
            with_nft.args,
            vec![
                CallArg::Object(ROLE.into()),
                CallArg::Object(NFT.into()),
                CallArg::Pure(PureArg::U64(42)),
            ]
        );

        let as_bot = mgr.withdraw_sui_as_bot(ROLE, 42);
        assert_eq!(as_bot.function, "withdraw_sui_as_bot");
        assert_eq!(as_bot.args.len(), 2);
        assert_eq!(as_bot.gas_split_total(), 0);
    }
}
