//! Relational operators carried by plan nodes.
//!
//! An operator holds only the node specific payload, most importantly the expressions embedded
//! in the node. Inputs live in [`PlanNode`], so rebuilding a node with new children never touches
//! the operator, and rebuilding it with new expressions never touches the inputs.
//!
//! Each operator declares its expressions explicitly, in field declaration order. That order is
//! a contract: [`OperatorTrait::with_new_expressions`] consumes expressions in the exact order
//! [`OperatorTrait::expressions`] produced them.
//!
//! [`PlanNode`]: crate::plan::PlanNode
mod relation;
pub use relation::*;
mod filter;
pub use filter::*;
mod projection;
pub use projection::*;
mod join;
pub use join::*;
mod limit;
pub use limit::*;
mod sort;
pub use sort::*;
mod aggregate;
pub use aggregate::*;
mod union;
pub use union::*;

use enum_as_inner::EnumAsInner;
use enum_dispatch::enum_dispatch;
use itertools::Itertools;
use strum_macros::AsRefStr;

use crate::error::{check_arity, QuartziteError, QuartziteResult};
use crate::expr::{AttributeReference, AttributeSet, ExprRef};
use crate::plan::PlanRef;

#[enum_dispatch(LogicalOperator)]
pub trait OperatorTrait {
    /// Number of inputs, `None` for operators accepting one or more inputs.
    fn arity(&self) -> Option<usize>;

    /// Expressions embedded in this operator, in field declaration order.
    fn expressions(&self) -> Vec<ExprRef>;

    /// Copy of this operator with every expression slot positionally replaced.
    fn with_new_expressions(&self, exprs: Vec<ExprRef>) -> QuartziteResult<LogicalOperator>;

    fn derive_output(&self, inputs: &[PlanRef]) -> Vec<AttributeReference>;

    /// Attributes introduced by this operator rather than read from its inputs.
    fn produced_attributes(&self) -> AttributeSet {
        AttributeSet::new()
    }
}

#[enum_dispatch(LogicalOperator)]
pub trait DisplayFields {
    /// Labelled non input arguments, rendered in plan captions.
    fn display_fields(&self) -> Vec<(&'static str, String)>;
}

/// Logical relational operator.
#[derive(Clone, Debug, Hash, Eq, PartialEq, EnumAsInner, AsRefStr)]
#[enum_dispatch]
pub enum LogicalOperator {
    Relation(Relation),
    Filter(Filter),
    Project(Project),
    Join(Join),
    Limit(Limit),
    Sort(Sort),
    Aggregate(Aggregate),
    Union(Union),
}

/// Positional consumer of a replacement expression list.
pub(crate) struct ExprSlots {
    node: &'static str,
    expected: usize,
    exprs: std::vec::IntoIter<ExprRef>,
}

impl ExprSlots {
    pub(crate) fn new(
        node: &'static str,
        expected: usize,
        exprs: Vec<ExprRef>,
    ) -> QuartziteResult<Self> {
        check_arity(node, "expressions", expected, exprs.len())?;
        Ok(Self {
            node,
            expected,
            exprs: exprs.into_iter(),
        })
    }

    pub(crate) fn one(&mut self) -> QuartziteResult<ExprRef> {
        let next = self.exprs.next();
        next.ok_or_else(|| self.exhausted())
    }

    pub(crate) fn take(&mut self, n: usize) -> QuartziteResult<Vec<ExprRef>> {
        let taken = self.exprs.by_ref().take(n).collect::<Vec<_>>();
        if taken.len() == n {
            Ok(taken)
        } else {
            Err(self.exhausted())
        }
    }

    fn exhausted(&self) -> QuartziteError {
        QuartziteError::ArityMismatch {
            node: self.node.to_string(),
            kind: "expressions",
            expected: self.expected,
            actual: self.expected - self.exprs.len(),
        }
    }
}

/// Attributes of the named expressions in `exprs` that are not plain references.
pub(crate) fn aliased_attributes(exprs: &[ExprRef]) -> AttributeSet {
    exprs
        .iter()
        .filter_map(|e| e.as_alias().map(|a| a.to_attribute()))
        .collect()
}

pub(crate) fn ensure_named(node: &str, exprs: &[ExprRef]) -> QuartziteResult<()> {
    match exprs.iter().find(|e| !e.is_named()) {
        Some(e) => Err(QuartziteError::InvalidPlan(format!(
            "{} expects named expressions, got {}",
            node, e
        ))),
        None => Ok(()),
    }
}

pub(crate) fn format_exprs(exprs: &[ExprRef]) -> String {
    format!("[{}]", exprs.iter().join(", "))
}

pub(crate) fn input_output(inputs: &[PlanRef], idx: usize) -> Vec<AttributeReference> {
    inputs
        .get(idx)
        .map(|input| input.output().to_vec())
        .unwrap_or_default()
}
