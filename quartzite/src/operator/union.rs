use crate::error::QuartziteResult;
use crate::expr::{AttributeReference, ExprRef, ExprTrait};
use crate::operator::{DisplayFields, ExprSlots, LogicalOperator, OperatorTrait};
use crate::plan::PlanRef;

/// Concatenation of its inputs. Output attributes are the ones of the first input, nullable
/// where any input is nullable.
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct Union {}

impl Union {
    pub fn new() -> Self {
        Self {}
    }
}

impl OperatorTrait for Union {
    fn arity(&self) -> Option<usize> {
        None
    }

    fn expressions(&self) -> Vec<ExprRef> {
        vec![]
    }

    fn with_new_expressions(&self, exprs: Vec<ExprRef>) -> QuartziteResult<LogicalOperator> {
        ExprSlots::new("Union", 0, exprs)?;
        Ok(self.clone().into())
    }

    fn derive_output(&self, inputs: &[PlanRef]) -> Vec<AttributeReference> {
        let Some((first, rest)) = inputs.split_first() else {
            return vec![];
        };
        first
            .output()
            .iter()
            .enumerate()
            .map(|(idx, attr)| {
                let nullable = attr.nullable()
                    || rest
                        .iter()
                        .any(|input| input.output().get(idx).map_or(false, |a| a.nullable()));
                attr.with_nullability(nullable)
            })
            .collect()
    }
}

impl DisplayFields for Union {
    fn display_fields(&self) -> Vec<(&'static str, String)> {
        vec![]
    }
}
