use std::path::PathBuf;

use arrow_schema::{DataType, Field};
use datafusion_expr::{AggregateFunction, JoinType, Operator};
use maplit::hashmap;
use quartzite::expr::{aggregate, alias, and, binary, col, lit, or, AttributeReference};
use quartzite::plan::{LogicalPlanBuilder, PlanRef};

use crate::utils::TestCaseRunner;

mod utils;

fn attributes(fields: Vec<Field>) -> Vec<AttributeReference> {
    fields.iter().map(AttributeReference::from_field).collect()
}

#[test]
fn test_rule_batches() {
    let t1_attrs = attributes(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("name", DataType::Utf8, true),
    ]);
    let t2_attrs = attributes(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("amount", DataType::Float64, true),
    ]);
    let (t1_id, name) = (&t1_attrs[0], &t1_attrs[1]);
    let (t2_id, amount) = (&t2_attrs[0], &t2_attrs[1]);

    let t1 = || LogicalPlanBuilder::scan("t1", t1_attrs.clone());
    let t2 = || LogicalPlanBuilder::scan("t2", t2_attrs.clone());
    let build = |builder: LogicalPlanBuilder| -> PlanRef { builder.build().unwrap() };

    let join = || {
        t1().join(
            build(t2().filter(lit(true))),
            JoinType::Inner,
            Some(binary(col(t1_id), Operator::Eq, col(t2_id))),
        )
    };

    let runner = TestCaseRunner {
        paths: vec![PathBuf::from("tests/resources/rules.yaml")],
        plans: hashmap! {
            "stacked_filters".to_string() => build(
                t1().filter(lit(true))
                    .filter(binary(col(name), Operator::Eq, lit("x")))
                    .filter(binary(col(t1_id), Operator::Gt, lit(1))),
            ),
            "stacked_limits".to_string() => build(
                t1().project(vec![col(t1_id), col(name)]).limit(10).limit(3),
            ),
            "boolean_noise".to_string() => build(t1().filter(or(
                and(binary(col(t1_id), Operator::Gt, lit(1)), lit(true)),
                lit(false),
            ))),
            "join".to_string() => build(join()),
            "aggregate".to_string() => build(
                join()
                    .filter(and(lit(true), lit(true)))
                    .project(vec![col(t1_id), col(name), col(t2_id), col(amount)])
                    .aggregate(
                        vec![col(name)],
                        vec![
                            col(name),
                            alias(aggregate(AggregateFunction::Sum, vec![col(amount)]), "total"),
                        ],
                    ),
            ),
        },
    };

    runner.run()
}
