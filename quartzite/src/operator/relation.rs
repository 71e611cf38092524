use crate::error::{QuartziteError, QuartziteResult};
use crate::expr::{col, AttributeReference, AttributeSet, ExprRef};
use crate::operator::{format_exprs, DisplayFields, ExprSlots, LogicalOperator, OperatorTrait};
use crate::plan::PlanRef;

/// Leaf producing the rows of a named relation.
///
/// The output attributes are kept as expressions so that expression rewrites, e.g. id
/// normalization, reach them like any other embedded expression.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Relation {
    name: String,
    output: Vec<ExprRef>,
}

impl Relation {
    pub fn new<S: Into<String>>(name: S, output: &[AttributeReference]) -> Self {
        Self {
            name: name.into(),
            output: output.iter().map(col).collect(),
        }
    }

    pub fn try_from_exprs<S: Into<String>>(name: S, output: Vec<ExprRef>) -> QuartziteResult<Self> {
        let name = name.into();
        if let Some(e) = output.iter().find(|e| !e.is_attribute()) {
            return Err(QuartziteError::InvalidPlan(format!(
                "relation {} outputs non attribute expression {}",
                name, e
            )));
        }
        Ok(Self { name, output })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> Vec<AttributeReference> {
        self.output
            .iter()
            .filter_map(|e| e.as_attribute().cloned())
            .collect()
    }
}

impl OperatorTrait for Relation {
    fn arity(&self) -> Option<usize> {
        Some(0)
    }

    fn expressions(&self) -> Vec<ExprRef> {
        self.output.clone()
    }

    fn with_new_expressions(&self, exprs: Vec<ExprRef>) -> QuartziteResult<LogicalOperator> {
        let mut slots = ExprSlots::new("Relation", self.output.len(), exprs)?;
        let output = slots.take(self.output.len())?;
        Ok(Relation::try_from_exprs(self.name.clone(), output)?.into())
    }

    fn derive_output(&self, _inputs: &[PlanRef]) -> Vec<AttributeReference> {
        self.attributes()
    }

    fn produced_attributes(&self) -> AttributeSet {
        self.attributes().into_iter().collect()
    }
}

impl DisplayFields for Relation {
    fn display_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("output", format_exprs(&self.output)),
        ]
    }
}
