use datafusion_expr::JoinType;

use crate::error::QuartziteResult;
use crate::expr::{AttributeReference, ExprRef};
use crate::operator::{input_output, DisplayFields, ExprSlots, LogicalOperator, OperatorTrait};
use crate::plan::PlanRef;

/// Logical join operator.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Join {
    join_type: JoinType,
    condition: Option<ExprRef>,
}

impl Join {
    pub fn new(join_type: JoinType, condition: Option<ExprRef>) -> Self {
        Self {
            join_type,
            condition,
        }
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn condition(&self) -> Option<&ExprRef> {
        self.condition.as_ref()
    }
}

fn nullable(attrs: Vec<AttributeReference>) -> Vec<AttributeReference> {
    attrs.iter().map(|a| a.with_nullability(true)).collect()
}

impl OperatorTrait for Join {
    fn arity(&self) -> Option<usize> {
        Some(2)
    }

    fn expressions(&self) -> Vec<ExprRef> {
        self.condition.iter().cloned().collect()
    }

    fn with_new_expressions(&self, exprs: Vec<ExprRef>) -> QuartziteResult<LogicalOperator> {
        let mut slots = ExprSlots::new("Join", self.condition.iter().count(), exprs)?;
        let condition = match &self.condition {
            Some(_) => Some(slots.one()?),
            None => None,
        };
        Ok(Join::new(self.join_type, condition).into())
    }

    fn derive_output(&self, inputs: &[PlanRef]) -> Vec<AttributeReference> {
        let left = input_output(inputs, 0);
        let right = input_output(inputs, 1);
        match self.join_type {
            JoinType::Inner => left.into_iter().chain(right).collect(),
            JoinType::Left => left.into_iter().chain(nullable(right)).collect(),
            JoinType::Right => nullable(left).into_iter().chain(right).collect(),
            JoinType::Full => nullable(left).into_iter().chain(nullable(right)).collect(),
            JoinType::LeftSemi | JoinType::LeftAnti => left,
            JoinType::RightSemi | JoinType::RightAnti => right,
        }
    }
}

impl DisplayFields for Join {
    fn display_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("join_type", self.join_type.to_string())];
        if let Some(condition) = &self.condition {
            fields.push(("condition", condition.to_string()));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use arrow_schema::DataType;
    use datafusion_expr::{JoinType, Operator};

    use crate::expr::{binary, col, AttributeReference, ExprTrait};
    use crate::plan::LogicalPlanBuilder;

    #[test]
    fn test_join_output_nullability() {
        let a = AttributeReference::new("a", DataType::Int32, false);
        let b = AttributeReference::new("b", DataType::Int32, false);
        let right = LogicalPlanBuilder::scan("r", vec![b.clone()]).build().unwrap();
        let condition = binary(col(&a), Operator::Eq, col(&b));

        let output = |join_type| {
            LogicalPlanBuilder::scan("l", vec![a.clone()])
                .join(right.clone(), join_type, Some(condition.clone()))
                .build()
                .unwrap()
                .output()
                .iter()
                .map(|attr| (attr.name().to_string(), attr.nullable()))
                .collect::<Vec<_>>()
        };

        assert_eq!(
            vec![("a".to_string(), false), ("b".to_string(), false)],
            output(JoinType::Inner)
        );
        assert_eq!(
            vec![("a".to_string(), false), ("b".to_string(), true)],
            output(JoinType::Left)
        );
        assert_eq!(
            vec![("a".to_string(), true), ("b".to_string(), true)],
            output(JoinType::Full)
        );
        assert_eq!(vec![("a".to_string(), false)], output(JoinType::LeftAnti));
    }
}
