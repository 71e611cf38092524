use crate::error::{QuartziteError, QuartziteResult};
use crate::expr::{AttributeReference, ExprRef};
use crate::operator::{
    format_exprs, input_output, DisplayFields, ExprSlots, LogicalOperator, OperatorTrait,
};
use crate::plan::PlanRef;

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Sort {
    order: Vec<ExprRef>,
}

impl Sort {
    /// Every entry of `order` must be a sort order expression.
    pub fn try_new<I: IntoIterator<Item = ExprRef>>(order: I) -> QuartziteResult<Self> {
        let order = order.into_iter().collect::<Vec<_>>();
        if let Some(e) = order.iter().find(|e| !e.is_sort_order()) {
            return Err(QuartziteError::InvalidPlan(format!(
                "Sort expects sort orders, got {}",
                e
            )));
        }
        Ok(Self { order })
    }

    pub fn order(&self) -> &[ExprRef] {
        &self.order
    }
}

impl OperatorTrait for Sort {
    fn arity(&self) -> Option<usize> {
        Some(1)
    }

    fn expressions(&self) -> Vec<ExprRef> {
        self.order.clone()
    }

    fn with_new_expressions(&self, exprs: Vec<ExprRef>) -> QuartziteResult<LogicalOperator> {
        let mut slots = ExprSlots::new("Sort", self.order.len(), exprs)?;
        Ok(Sort::try_new(slots.take(self.order.len())?)?.into())
    }

    fn derive_output(&self, inputs: &[PlanRef]) -> Vec<AttributeReference> {
        input_output(inputs, 0)
    }
}

impl DisplayFields for Sort {
    fn display_fields(&self) -> Vec<(&'static str, String)> {
        vec![("order", format_exprs(&self.order))]
    }
}
