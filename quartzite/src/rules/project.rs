use crate::error::QuartziteResult;
use crate::operator::LogicalOperator;
use crate::plan::PlanRef;
use crate::rules::{Rule, RuleId};
use crate::tree::TreeNode;

/// Removes projections that output exactly the attributes of their input, in the same order.
#[derive(Clone, Default)]
pub struct RemoveNoopProjectRule {}

impl RemoveNoopProjectRule {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for RemoveNoopProjectRule {
    fn apply(&self, plan: &PlanRef) -> QuartziteResult<PlanRef> {
        plan.transform_up(&mut |node| match (node.operator(), node.inputs()) {
            (LogicalOperator::Project(project), [child])
                if project.list().iter().all(|e| e.is_attribute())
                    && node.output_set().ids() == child.output_set().ids()
                    && node.output().len() == child.output().len() =>
            {
                Ok(child.clone())
            }
            _ => Ok(node.clone()),
        })
    }

    fn name(&self) -> &str {
        let name: &'static str = RuleId::RemoveNoopProject.into();
        name
    }

    fn rule_id(&self) -> Option<RuleId> {
        Some(RuleId::RemoveNoopProject)
    }
}
