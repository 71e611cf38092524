use crate::error::QuartziteResult;
use crate::expr::{AttributeReference, AttributeSet, ExprRef};
use crate::operator::{
    aliased_attributes, ensure_named, format_exprs, DisplayFields, ExprSlots, LogicalOperator,
    OperatorTrait,
};
use crate::plan::PlanRef;

/// Grouped aggregation. The output is exactly the named `aggregates` list.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Aggregate {
    group_by: Vec<ExprRef>,
    aggregates: Vec<ExprRef>,
}

impl Aggregate {
    pub fn try_new(group_by: Vec<ExprRef>, aggregates: Vec<ExprRef>) -> QuartziteResult<Self> {
        ensure_named("Aggregate", &aggregates)?;
        Ok(Self {
            group_by,
            aggregates,
        })
    }

    pub fn group_by(&self) -> &[ExprRef] {
        &self.group_by
    }

    pub fn aggregates(&self) -> &[ExprRef] {
        &self.aggregates
    }
}

impl OperatorTrait for Aggregate {
    fn arity(&self) -> Option<usize> {
        Some(1)
    }

    fn expressions(&self) -> Vec<ExprRef> {
        self.group_by
            .iter()
            .chain(self.aggregates.iter())
            .cloned()
            .collect()
    }

    fn with_new_expressions(&self, exprs: Vec<ExprRef>) -> QuartziteResult<LogicalOperator> {
        let mut slots = ExprSlots::new(
            "Aggregate",
            self.group_by.len() + self.aggregates.len(),
            exprs,
        )?;
        let group_by = slots.take(self.group_by.len())?;
        let aggregates = slots.take(self.aggregates.len())?;
        Ok(Aggregate::try_new(group_by, aggregates)?.into())
    }

    fn derive_output(&self, _inputs: &[PlanRef]) -> Vec<AttributeReference> {
        self.aggregates
            .iter()
            .filter_map(|e| e.to_attribute())
            .collect()
    }

    fn produced_attributes(&self) -> AttributeSet {
        aliased_attributes(&self.aggregates)
    }
}

impl DisplayFields for Aggregate {
    fn display_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("group_by", format_exprs(&self.group_by)),
            ("aggregates", format_exprs(&self.aggregates)),
        ]
    }
}
