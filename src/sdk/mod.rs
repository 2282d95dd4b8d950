//! SDK: move-call construction for the anemone package.
//!
//! Builders here are pure: they turn primitive inputs into an unsigned
//! [`CallSpec`] and never touch the network. Resolution of object references,
//! gas, signing, and execution are the chain module's job.

pub mod call;
pub mod role_manager;
pub mod skill_manager;

pub use call::{CallArg, CallSpec, PureArg};
pub use role_manager::RoleManager;
pub use skill_manager::SkillManager;

/// Facade bundling the role and skill builders.
#[derive(Debug, Default)]
pub struct AnemoneSdk {
    pub role_manager: RoleManager,
    pub skill_manager: SkillManager,
}

impl AnemoneSdk {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_reaches_both_managers() {
        let sdk = AnemoneSdk::new();
        let deposit = sdk.role_manager.deposit_sui("0xr01e", 1_000_000);
        assert_eq!(deposit.target("0xpkg"), "0xpkg::role_manager::deposit_sui");

        let toggle = sdk.skill_manager.toggle_skill("0x5k111");
        assert_eq!(toggle.target("0xpkg"), "0xpkg::skill_manager::toggle_skill");
    }
}
