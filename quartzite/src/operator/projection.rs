use crate::error::QuartziteResult;
use crate::expr::{AttributeReference, AttributeSet, ExprRef};
use crate::operator::{
    aliased_attributes, ensure_named, format_exprs, DisplayFields, ExprSlots, LogicalOperator,
    OperatorTrait,
};
use crate::plan::PlanRef;

/// Projection. Every list entry is a named expression.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Project {
    list: Vec<ExprRef>,
}

impl Project {
    pub fn try_new<I: IntoIterator<Item = ExprRef>>(list: I) -> QuartziteResult<Self> {
        let list = list.into_iter().collect::<Vec<_>>();
        ensure_named("Project", &list)?;
        Ok(Self { list })
    }

    pub fn list(&self) -> &[ExprRef] {
        &self.list
    }
}

impl OperatorTrait for Project {
    fn arity(&self) -> Option<usize> {
        Some(1)
    }

    fn expressions(&self) -> Vec<ExprRef> {
        self.list.clone()
    }

    fn with_new_expressions(&self, exprs: Vec<ExprRef>) -> QuartziteResult<LogicalOperator> {
        let mut slots = ExprSlots::new("Project", self.list.len(), exprs)?;
        Ok(Project::try_new(slots.take(self.list.len())?)?.into())
    }

    fn derive_output(&self, _inputs: &[PlanRef]) -> Vec<AttributeReference> {
        self.list.iter().filter_map(|e| e.to_attribute()).collect()
    }

    fn produced_attributes(&self) -> AttributeSet {
        aliased_attributes(&self.list)
    }
}

impl DisplayFields for Project {
    fn display_fields(&self) -> Vec<(&'static str, String)> {
        vec![("list", format_exprs(&self.list))]
    }
}
