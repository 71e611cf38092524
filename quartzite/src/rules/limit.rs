use std::cmp::min;
use std::sync::Arc;

use crate::error::QuartziteResult;
use crate::operator::{Limit, LogicalOperator};
use crate::plan::{PlanNode, PlanRef};
use crate::rules::{Rule, RuleId};
use crate::tree::TreeNode;

/// Collapses two adjacent limits into one keeping the smaller count.
#[derive(Clone, Default)]
pub struct CombineLimitsRule {}

impl CombineLimitsRule {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for CombineLimitsRule {
    fn apply(&self, plan: &PlanRef) -> QuartziteResult<PlanRef> {
        plan.transform_up(&mut |node| {
            if let (LogicalOperator::Limit(limit1), [child]) = (node.operator(), node.inputs()) {
                if let LogicalOperator::Limit(limit2) = child.operator() {
                    let new_limit = min(limit1.limit(), limit2.limit());
                    let merged =
                        PlanNode::try_new(Limit::new(new_limit).into(), child.inputs().to_vec())?;
                    return Ok(Arc::new(merged));
                }
            }
            Ok(node.clone())
        })
    }

    fn name(&self) -> &str {
        let name: &'static str = RuleId::CombineLimits.into();
        name
    }

    fn rule_id(&self) -> Option<RuleId> {
        Some(RuleId::CombineLimits)
    }
}
