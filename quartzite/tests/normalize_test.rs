use arrow_schema::DataType;
use datafusion_expr::{JoinType, Operator};
use quartzite::executor::{Batch, FixedPoint, RulesExecutor, Strategy};
use quartzite::expr::{alias, binary, col, lit, AttributeReference, ExprId};
use quartzite::normalize::{normalize_expr_ids, plans_equivalent};
use quartzite::plan::{LogicalPlanBuilder, PlanRef};
use quartzite::rules::{CombineFiltersRule, Rule};
use quartzite::tree::TreeNode;

fn self_join(id: u64) -> PlanRef {
    let key = AttributeReference::with_id("key", DataType::Int64, false, ExprId::new(id));
    let other = AttributeReference::new("key", DataType::Int64, false);
    let right = LogicalPlanBuilder::scan("s", vec![other.clone()])
        .build()
        .unwrap();

    LogicalPlanBuilder::scan("r", vec![key.clone()])
        .filter(binary(col(&key), Operator::Gt, lit(0i64)))
        .join(
            right,
            JoinType::Left,
            Some(binary(col(&key), Operator::Eq, col(&other))),
        )
        .project(vec![alias(col(&key), "k")])
        .build()
        .unwrap()
}

#[test]
fn test_independently_allocated_ids_normalize_equal() {
    let p7 = self_join(7);
    let p42 = self_join(42);
    assert_ne!(p7, p42);

    let n7 = normalize_expr_ids(&p7).unwrap();
    let n42 = normalize_expr_ids(&p42).unwrap();

    assert_eq!(n7, n42);
    assert_eq!(ExprId::new(0), n7.inputs()[0].inputs()[0].output()[0].expr_id());
    assert!(plans_equivalent(&p7, &p42).unwrap());
}

#[test]
fn test_normalize_twice() {
    let once = normalize_expr_ids(&self_join(7)).unwrap();
    let twice = normalize_expr_ids(&once).unwrap();

    assert!(once.same(&twice));
}

#[test]
fn test_optimized_plans_compare_after_normalization() {
    let executor = RulesExecutor::new(vec![Batch::new(
        "filters",
        Strategy::FixedPoint(FixedPoint::unlimited()),
        vec![CombineFiltersRule::new().into()],
    )]);

    let build = || {
        let a = AttributeReference::new("a", DataType::Int64, false);
        LogicalPlanBuilder::scan("r", vec![a.clone()])
            .filter(binary(col(&a), Operator::Gt, lit(0i64)))
            .filter(binary(col(&a), Operator::Lt, lit(10i64)))
            .build()
            .unwrap()
    };

    let first = executor.execute(&build()).unwrap();
    let second = executor.execute(&build()).unwrap();

    assert_ne!(first, second);
    assert!(plans_equivalent(&first, &second).unwrap());
    assert!(CombineFiltersRule::new().apply(&first).unwrap().same(&first));
}
