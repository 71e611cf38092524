use crate::error::QuartziteResult;
use crate::expr::{AttributeReference, ExprRef};
use crate::operator::{input_output, DisplayFields, ExprSlots, LogicalOperator, OperatorTrait};
use crate::plan::PlanRef;

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Limit {
    limit: usize,
}

impl Limit {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl OperatorTrait for Limit {
    fn arity(&self) -> Option<usize> {
        Some(1)
    }

    fn expressions(&self) -> Vec<ExprRef> {
        vec![]
    }

    fn with_new_expressions(&self, exprs: Vec<ExprRef>) -> QuartziteResult<LogicalOperator> {
        ExprSlots::new("Limit", 0, exprs)?;
        Ok(self.clone().into())
    }

    fn derive_output(&self, inputs: &[PlanRef]) -> Vec<AttributeReference> {
        input_output(inputs, 0)
    }
}

impl DisplayFields for Limit {
    fn display_fields(&self) -> Vec<(&'static str, String)> {
        vec![("limit", self.limit.to_string())]
    }
}
