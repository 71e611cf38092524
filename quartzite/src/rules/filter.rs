use std::sync::Arc;

use crate::error::QuartziteResult;
use crate::expr::and;
use crate::operator::{Filter, LogicalOperator};
use crate::plan::{PlanNode, PlanRef};
use crate::rules::{Rule, RuleId};
use crate::tree::TreeNode;

/// Merges a filter sitting directly on another filter into one filter whose condition is the
/// conjunction of both, outer condition first.
#[derive(Clone, Default)]
pub struct CombineFiltersRule {}

impl CombineFiltersRule {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for CombineFiltersRule {
    fn apply(&self, plan: &PlanRef) -> QuartziteResult<PlanRef> {
        plan.transform_up(&mut |node| {
            let (outer, child) = match (node.operator(), node.inputs()) {
                (LogicalOperator::Filter(outer), [child]) => (outer, child),
                _ => return Ok(node.clone()),
            };
            match child.operator() {
                LogicalOperator::Filter(inner) => {
                    let condition = and(outer.condition().clone(), inner.condition().clone());
                    let merged = PlanNode::try_new(
                        Filter::new(condition).into(),
                        child.inputs().to_vec(),
                    )?;
                    Ok(Arc::new(merged))
                }
                _ => Ok(node.clone()),
            }
        })
    }

    fn name(&self) -> &str {
        let name: &'static str = RuleId::CombineFilters.into();
        name
    }

    fn rule_id(&self) -> Option<RuleId> {
        Some(RuleId::CombineFilters)
    }
}

/// Removes filters whose condition is the literal `true`.
#[derive(Clone, Default)]
pub struct PruneTrueFilterRule {}

impl PruneTrueFilterRule {
    pub fn new() -> Self {
        Self {}
    }
}

impl Rule for PruneTrueFilterRule {
    fn apply(&self, plan: &PlanRef) -> QuartziteResult<PlanRef> {
        plan.transform_up(&mut |node| match (node.operator(), node.inputs()) {
            (LogicalOperator::Filter(filter), [child]) if filter.condition().is_true_literal() => {
                Ok(child.clone())
            }
            _ => Ok(node.clone()),
        })
    }

    fn name(&self) -> &str {
        let name: &'static str = RuleId::PruneTrueFilter.into();
        name
    }

    fn rule_id(&self) -> Option<RuleId> {
        Some(RuleId::PruneTrueFilter)
    }
}

#[cfg(test)]
mod tests {
    use datafusion_expr::Operator;

    use crate::expr::{and, binary, col, lit};
    use crate::plan::LogicalPlanBuilder;
    use crate::rules::{CombineFiltersRule, PruneTrueFilterRule, Rule};
    use crate::test_utils::t1;
    use crate::tree::TreeNode;

    #[test]
    fn test_combine_filters() {
        let (scan, [c1, c2]) = t1();
        let cond1 = binary(col(&c1), Operator::Gt, lit(1));
        let cond2 = binary(col(&c2), Operator::Eq, lit("x"));
        let plan = LogicalPlanBuilder::from_plan(scan.clone())
            .filter(cond2.clone())
            .filter(cond1.clone())
            .build()
            .unwrap();

        let rewritten = CombineFiltersRule::new().apply(&plan).unwrap();

        let expected = LogicalPlanBuilder::from_plan(scan.clone())
            .filter(and(cond1, cond2))
            .build()
            .unwrap();
        assert_eq!(expected, rewritten);
        assert!(rewritten.inputs()[0].same(&scan));
    }

    #[test]
    fn test_combine_filters_no_match() {
        let (scan, [c1, _]) = t1();
        let plan = LogicalPlanBuilder::from_plan(scan)
            .filter(binary(col(&c1), Operator::Gt, lit(1)))
            .limit(1)
            .filter(binary(col(&c1), Operator::Lt, lit(5)))
            .build()
            .unwrap();

        let rewritten = CombineFiltersRule::new().apply(&plan).unwrap();

        assert!(plan.same(&rewritten));
    }

    #[test]
    fn test_prune_true_filter() {
        let (scan, _) = t1();
        let plan = LogicalPlanBuilder::from_plan(scan.clone())
            .filter(lit(true))
            .limit(3)
            .build()
            .unwrap();

        let rewritten = PruneTrueFilterRule::new().apply(&plan).unwrap();

        assert_eq!("Limit", rewritten.node_name());
        assert!(rewritten.inputs()[0].same(&scan));
    }
}
