//! Rewrite rules.
//!
//! A rule is a pure function from plan to plan. It walks the plan itself, usually with
//! [`TreeNode::transform_up`] or [`TreeNode::transform_down`], and rewrites the shapes it
//! recognizes. Shapes it does not recognize are returned untouched, so that a rule matching
//! nothing returns the very [`PlanRef`] it was given. The executor relies on this to detect fixed
//! points.
//!
//! Built-in rules are identified by a [`RuleId`], which lets executor configuration name and
//! exclude them. Ad hoc rules can be written as closures with [`FnRule`].
//!
//! [`TreeNode::transform_up`]: crate::tree::TreeNode::transform_up
//! [`TreeNode::transform_down`]: crate::tree::TreeNode::transform_down
mod filter;
pub use filter::*;
mod limit;
pub use limit::*;
mod boolean;
pub use boolean::*;
mod project;
pub use project::*;
mod function;
pub use function::*;

use std::fmt::{Debug, Formatter};

use enum_dispatch::enum_dispatch;
use enumset::EnumSetType;
use strum_macros::{AsRefStr, EnumString, IntoStaticStr};

use crate::error::QuartziteResult;
use crate::plan::PlanRef;

#[enum_dispatch(RuleImpl)]
pub trait Rule {
    /// Rewrites `plan`, returning it unchanged when nothing matches.
    fn apply(&self, plan: &PlanRef) -> QuartziteResult<PlanRef>;

    fn name(&self) -> &str;

    /// Identifies built-in rules, `None` for ad hoc rules.
    fn rule_id(&self) -> Option<RuleId>;
}

#[enum_dispatch]
#[derive(Clone, AsRefStr)]
pub enum RuleImpl {
    CombineFiltersRule,
    CombineLimitsRule,
    SimplifyBooleansRule,
    PruneTrueFilterRule,
    RemoveNoopProjectRule,
    FnRule,
}

#[derive(EnumSetType, Debug, EnumString, IntoStaticStr, strum_macros::Display)]
pub enum RuleId {
    CombineFilters,
    CombineLimits,
    SimplifyBooleans,
    PruneTrueFilter,
    RemoveNoopProject,
}

impl RuleImpl {
    pub fn builtin(rule_id: RuleId) -> Self {
        match rule_id {
            RuleId::CombineFilters => CombineFiltersRule::new().into(),
            RuleId::CombineLimits => CombineLimitsRule::new().into(),
            RuleId::SimplifyBooleans => SimplifyBooleansRule::new().into(),
            RuleId::PruneTrueFilter => PruneTrueFilterRule::new().into(),
            RuleId::RemoveNoopProject => RemoveNoopProjectRule::new().into(),
        }
    }
}

impl Debug for RuleImpl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:?})", self.as_ref(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use enumset::EnumSet;

    use crate::rules::{Rule, RuleId, RuleImpl};

    #[test]
    fn test_builtin_rules_report_their_id() {
        for rule_id in EnumSet::<RuleId>::all() {
            let rule = RuleImpl::builtin(rule_id);
            assert_eq!(Some(rule_id), rule.rule_id());
            assert_eq!(rule_id.to_string(), rule.name());
        }
    }

    #[test]
    fn test_parse_rule_id() {
        assert_eq!(RuleId::CombineFilters, RuleId::from_str("CombineFilters").unwrap());
        assert!(RuleId::from_str("NoSuchRule").is_err());
    }
}
