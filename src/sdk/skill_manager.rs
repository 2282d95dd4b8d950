//! Skill move-call builders.

use crate::sdk::call::{CallSpec, PureArg};

const MODULE: &str = "skill_manager";

#[derive(Debug, Default)]
pub struct SkillManager;

impl SkillManager {
    pub fn new() -> Self {
        Self
    }

    /// Publish a new Skill. `fee` is the per-use fee in MIST.
    pub fn create_skill(&self, name: &str, description: &str, doc: &str, fee: u64) -> CallSpec {
        CallSpec::new(MODULE, "create_skill")
            .pure(PureArg::Str(name.to_string()))
            .pure(PureArg::Str(description.to_string()))
            .pure(PureArg::Str(doc.to_string()))
            .pure(PureArg::U64(fee))
    }

    /// Replace a Skill's metadata and fee.
    pub fn update_skill(
        &self,
        skill_id: &str,
        name: &str,
        description: &str,
        doc: &str,
        fee: u64,
    ) -> CallSpec {
        CallSpec::new(MODULE, "update_skill")
            .object(skill_id)
            .pure(PureArg::Str(name.to_string()))
            .pure(PureArg::Str(description.to_string()))
            .pure(PureArg::Str(doc.to_string()))
            .pure(PureArg::U64(fee))
    }

    /// Flip the Skill's enabled flag.
    pub fn toggle_skill(&self, skill_id: &str) -> CallSpec {
        CallSpec::new(MODULE, "toggle_skill").object(skill_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::call::CallArg;

    #[test]
    fn test_create_skill_shape() {
        let spec = SkillManager::new().create_skill("search", "Web search", "POST /q", 1_000_000);
        assert_eq!(spec.target("0xpkg"), "0xpkg::skill_manager::create_skill");
        assert_eq!(
            spec.args,
            vec![
                CallArg::Pure(PureArg::Str("search".into())),
                CallArg::Pure(PureArg::Str("Web search".into())),
                CallArg::Pure(PureArg::Str("POST /q".into())),
                CallArg::Pure(PureArg::U64(1_000_000)),
            ]
        );
    }

    #[test]
    fn test_update_skill_leads_with_object() {
        let spec = SkillManager::new().update_skill("0xs", "n", "d", "doc", 5);
        assert_eq!(spec.function, "update_skill");
        assert_eq!(spec.args.len(), 5);
        assert_eq!(spec.args[0], CallArg::Object("0xs".into()));
        assert_eq!(spec.args[4], CallArg::Pure(PureArg::U64(5)));
    }

    #[test]
    fn test_toggle_skill_shape() {
        let spec = SkillManager::new().toggle_skill("0xs");
        assert_eq!(spec.target("0xp"), "0xp::skill_manager::toggle_skill");
        assert_eq!(spec.args, vec![CallArg::Object("0xs".into())]);
    }
}
