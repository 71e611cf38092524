use crate::error::QuartziteResult;
use crate::expr::{AttributeReference, ExprRef};
use crate::operator::{input_output, DisplayFields, ExprSlots, LogicalOperator, OperatorTrait};
use crate::plan::PlanRef;

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Filter {
    condition: ExprRef,
}

impl Filter {
    pub fn new(condition: ExprRef) -> Self {
        Self { condition }
    }

    pub fn condition(&self) -> &ExprRef {
        &self.condition
    }
}

impl OperatorTrait for Filter {
    fn arity(&self) -> Option<usize> {
        Some(1)
    }

    fn expressions(&self) -> Vec<ExprRef> {
        vec![self.condition.clone()]
    }

    fn with_new_expressions(&self, exprs: Vec<ExprRef>) -> QuartziteResult<LogicalOperator> {
        let mut slots = ExprSlots::new("Filter", 1, exprs)?;
        Ok(Filter::new(slots.one()?).into())
    }

    fn derive_output(&self, inputs: &[PlanRef]) -> Vec<AttributeReference> {
        input_output(inputs, 0)
    }
}

impl DisplayFields for Filter {
    fn display_fields(&self) -> Vec<(&'static str, String)> {
        vec![("condition", self.condition.to_string())]
    }
}
