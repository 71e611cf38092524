use arrow_schema::Schema;

use crate::expr::AttributeReference;
use crate::plan::{LogicalPlanBuilder, PlanRef};

const T1_SCHEMA_JSON: &str = r#"{
    "fields": [
        {
            "name": "c1",
            "nullable": false,
            "data_type": "Int32",
            "dict_id": 0,
            "dict_is_ordered": false,
            "metadata": {}
        },
        {
            "name": "c2",
            "nullable": true,
            "data_type": "Utf8",
            "dict_id": 0,
            "dict_is_ordered": false,
            "metadata": {}
        }
    ],
    "metadata": {}
}"#;

const T2_SCHEMA_JSON: &str = r#"{
    "fields": [
        {
            "name": "c3",
            "nullable": false,
            "data_type": "Int32",
            "dict_id": 0,
            "dict_is_ordered": false,
            "metadata": {}
        },
        {
            "name": "c4",
            "nullable": true,
            "data_type": "Utf8",
            "dict_id": 0,
            "dict_is_ordered": false,
            "metadata": {}
        }
    ],
    "metadata": {}
}"#;

/// Relation named `name` whose attributes are freshly allocated from the fields of `json`.
pub fn relation_from_schema(name: &str, json: &str) -> (PlanRef, Vec<AttributeReference>) {
    let schema: Schema = serde_json::from_str(json).unwrap();
    let attrs = schema
        .fields()
        .iter()
        .map(|f| AttributeReference::from_field(f))
        .collect::<Vec<_>>();

    let plan = LogicalPlanBuilder::scan(name, attrs.clone()).build().unwrap();
    (plan, attrs)
}

/// `t1(c1 INT NOT NULL, c2 VARCHAR)`.
pub fn t1() -> (PlanRef, [AttributeReference; 2]) {
    let (plan, attrs) = relation_from_schema("t1", T1_SCHEMA_JSON);
    (plan, attrs.try_into().unwrap())
}

/// `t2(c3 INT NOT NULL, c4 VARCHAR)`.
pub fn t2() -> (PlanRef, [AttributeReference; 2]) {
    let (plan, attrs) = relation_from_schema("t2", T2_SCHEMA_JSON);
    (plan, attrs.try_into().unwrap())
}
