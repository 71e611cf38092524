use std::sync::Arc;

use datafusion_expr::JoinType;

use crate::error::QuartziteResult;
use crate::expr::{AttributeReference, ExprRef};
use crate::operator::{
    Aggregate, Filter, Join, Limit, LogicalOperator, Project, Relation, Sort, Union,
};
use crate::plan::{PlanNode, PlanRef};

/// Builds a plan bottom up, one operator per call.
///
/// The first failure is kept and reported by [`LogicalPlanBuilder::build`], later calls are
/// ignored.
pub struct LogicalPlanBuilder {
    root: QuartziteResult<PlanRef>,
}

impl LogicalPlanBuilder {
    pub fn scan<S: Into<String>>(name: S, output: Vec<AttributeReference>) -> Self {
        Self::from_operator(Relation::new(name, &output).into(), vec![])
    }

    pub fn from_plan(plan: PlanRef) -> Self {
        Self { root: Ok(plan) }
    }

    fn from_operator(operator: LogicalOperator, inputs: Vec<PlanRef>) -> Self {
        Self {
            root: PlanNode::try_new(operator, inputs).map(Arc::new),
        }
    }

    fn push<F>(self, f: F) -> Self
    where
        F: FnOnce(PlanRef) -> QuartziteResult<PlanNode>,
    {
        Self {
            root: self.root.and_then(|input| f(input).map(Arc::new)),
        }
    }

    pub fn filter(self, condition: ExprRef) -> Self {
        self.push(|input| PlanNode::try_new(Filter::new(condition).into(), vec![input]))
    }

    pub fn project<I: IntoIterator<Item = ExprRef>>(self, list: I) -> Self {
        self.push(|input| PlanNode::try_new(Project::try_new(list)?.into(), vec![input]))
    }

    pub fn limit(self, limit: usize) -> Self {
        self.push(|input| PlanNode::try_new(Limit::new(limit).into(), vec![input]))
    }

    pub fn sort<I: IntoIterator<Item = ExprRef>>(self, order: I) -> Self {
        self.push(|input| PlanNode::try_new(Sort::try_new(order)?.into(), vec![input]))
    }

    pub fn aggregate(self, group_by: Vec<ExprRef>, aggregates: Vec<ExprRef>) -> Self {
        self.push(|input| {
            PlanNode::try_new(Aggregate::try_new(group_by, aggregates)?.into(), vec![input])
        })
    }

    /// Joins the current plan, as left side, with `right`.
    pub fn join(self, right: PlanRef, join_type: JoinType, condition: Option<ExprRef>) -> Self {
        self.push(|left| {
            PlanNode::try_new(Join::new(join_type, condition).into(), vec![left, right])
        })
    }

    pub fn union<I: IntoIterator<Item = PlanRef>>(self, others: I) -> Self {
        self.push(|first| {
            let inputs = std::iter::once(first).chain(others).collect();
            PlanNode::try_new(Union::new().into(), inputs)
        })
    }

    pub fn build(self) -> QuartziteResult<PlanRef> {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use datafusion_expr::Operator;

    use crate::error::QuartziteError;
    use crate::expr::{binary, col, lit, sort_order};
    use crate::plan::LogicalPlanBuilder;
    use crate::test_utils::{t1, t2};
    use crate::tree::TreeNode;

    #[test]
    fn test_build_chain() {
        let (scan, [c1, c2]) = t1();
        let plan = LogicalPlanBuilder::from_plan(scan.clone())
            .filter(binary(col(&c1), Operator::Gt, lit(1)))
            .sort(vec![sort_order(col(&c2), true, false)])
            .limit(10)
            .build()
            .unwrap();

        assert_eq!("Limit", plan.node_name());
        assert_eq!("Sort", plan.inputs()[0].node_name());
        assert_eq!("Filter", plan.inputs()[0].inputs()[0].node_name());
        assert!(plan.inputs()[0].inputs()[0].inputs()[0].same(&scan));
        assert_eq!(scan.output(), plan.output());
    }

    #[test]
    fn test_first_error_wins() {
        let (scan, [c1, _]) = t1();
        let result = LogicalPlanBuilder::from_plan(scan)
            .project(vec![binary(col(&c1), Operator::Plus, lit(1))])
            .sort(vec![col(&c1)])
            .build();

        match result {
            Err(QuartziteError::InvalidPlan(msg)) => {
                assert!(msg.starts_with("Project"), "unexpected message {}", msg)
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_union() {
        let (left, _) = t1();
        let (right, _) = t2();
        let plan = LogicalPlanBuilder::from_plan(left.clone())
            .union(vec![right.clone()])
            .build()
            .unwrap();

        assert_eq!(2, plan.inputs().len());
        assert_eq!(
            left.output().iter().map(|a| a.name()).collect::<Vec<_>>(),
            plan.output().iter().map(|a| a.name()).collect::<Vec<_>>()
        );
    }
}
