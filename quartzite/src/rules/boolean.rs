use datafusion_expr::Operator;

use crate::error::QuartziteResult;
use crate::expr::{lit, Expr, ExprRef};
use crate::plan::PlanRef;
use crate::rules::{Rule, RuleId};
use crate::tree::TreeNode;

/// Folds boolean literals out of `AND`, `OR` and `NOT` in every expression of the plan.
#[derive(Clone, Default)]
pub struct SimplifyBooleansRule {}

impl SimplifyBooleansRule {
    pub fn new() -> Self {
        Self {}
    }
}

fn simplify(e: &ExprRef) -> QuartziteResult<ExprRef> {
    let simplified = match &**e {
        Expr::Binary(b) if b.op() == Operator::And => {
            let (left, right) = (b.left(), b.right());
            if left.is_false_literal() || right.is_false_literal() {
                lit(false)
            } else if left.is_true_literal() {
                right.clone()
            } else if right.is_true_literal() {
                left.clone()
            } else {
                e.clone()
            }
        }
        Expr::Binary(b) if b.op() == Operator::Or => {
            let (left, right) = (b.left(), b.right());
            if left.is_true_literal() || right.is_true_literal() {
                lit(true)
            } else if left.is_false_literal() {
                right.clone()
            } else if right.is_false_literal() {
                left.clone()
            } else {
                e.clone()
            }
        }
        Expr::Not(not) => match &**not.child() {
            c if c.is_true_literal() => lit(false),
            c if c.is_false_literal() => lit(true),
            Expr::Not(inner) => inner.child().clone(),
            _ => e.clone(),
        },
        _ => e.clone(),
    };
    Ok(simplified)
}

impl Rule for SimplifyBooleansRule {
    fn apply(&self, plan: &PlanRef) -> QuartziteResult<PlanRef> {
        plan.transform_up(&mut |node| node.transform_expressions_up(&mut simplify))
    }

    fn name(&self) -> &str {
        let name: &'static str = RuleId::SimplifyBooleans.into();
        name
    }

    fn rule_id(&self) -> Option<RuleId> {
        Some(RuleId::SimplifyBooleans)
    }
}

#[cfg(test)]
mod tests {
    use datafusion_expr::Operator;

    use crate::expr::{and, binary, col, lit, not, or};
    use crate::operator::LogicalOperator;
    use crate::plan::LogicalPlanBuilder;
    use crate::rules::{Rule, SimplifyBooleansRule};
    use crate::test_utils::t1;
    use crate::tree::TreeNode;

    #[test]
    fn test_simplify_booleans() {
        let (scan, [c1, _]) = t1();
        let pred = binary(col(&c1), Operator::Gt, lit(1));
        let plan = LogicalPlanBuilder::from_plan(scan)
            .filter(or(
                and(lit(true), pred.clone()),
                and(not(not(lit(false))), pred.clone()),
            ))
            .build()
            .unwrap();

        let rewritten = SimplifyBooleansRule::new().apply(&plan).unwrap();

        match rewritten.operator() {
            LogicalOperator::Filter(filter) => assert_eq!(&pred, filter.condition()),
            other => panic!("unexpected operator {:?}", other),
        }
    }

    #[test]
    fn test_nothing_to_simplify() {
        let (scan, [c1, _]) = t1();
        let plan = LogicalPlanBuilder::from_plan(scan)
            .filter(not(binary(col(&c1), Operator::Gt, lit(1))))
            .build()
            .unwrap();

        let rewritten = SimplifyBooleansRule::new().apply(&plan).unwrap();

        assert!(plan.same(&rewritten));
    }
}
