//! Plan nodes.
//!
//! A [`PlanNode`] pairs a [`LogicalOperator`] with its inputs. Nodes are immutable and shared
//! through [`PlanRef`]; the same subtree may be referenced by several parents or kept across
//! optimizer iterations without copying.
mod builder;
pub use builder::*;
pub mod explain;

use std::fmt::{Debug, Formatter};
use std::sync::{Arc, OnceLock};

use arrow_schema::Schema;

use crate::error::{check_arity, QuartziteError, QuartziteResult};
use crate::expr::{AttributeReference, AttributeSet, ExprId, ExprRef};
use crate::operator::{DisplayFields, LogicalOperator, OperatorTrait};
use crate::properties::LogicalProperty;
use crate::tree::{Children, TreeNode};

pub type PlanRef = Arc<PlanNode>;

/// One node in a plan.
pub struct PlanNode {
    operator: LogicalOperator,
    inputs: Vec<PlanRef>,
    logical_prop: OnceLock<LogicalProperty>,
}

/// The `eq` should ignore cached properties, they are derived from operator and inputs.
impl PartialEq for PlanNode {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator && self.inputs == other.inputs
    }
}

impl Eq for PlanNode {}

impl Debug for PlanNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanNode")
            .field("operator", &self.operator)
            .field("inputs", &self.inputs)
            .finish()
    }
}

impl PlanNode {
    pub fn try_new(operator: LogicalOperator, inputs: Vec<PlanRef>) -> QuartziteResult<Self> {
        match operator.arity() {
            Some(arity) => check_arity(operator.as_ref(), "inputs", arity, inputs.len())?,
            None if inputs.is_empty() => {
                return Err(QuartziteError::InvalidPlan(format!(
                    "{} requires at least one input",
                    operator.as_ref()
                )))
            }
            None => {}
        }
        Ok(Self::new_unchecked(operator, inputs))
    }

    fn new_unchecked(operator: LogicalOperator, inputs: Vec<PlanRef>) -> Self {
        Self {
            operator,
            inputs,
            logical_prop: OnceLock::new(),
        }
    }

    pub fn operator(&self) -> &LogicalOperator {
        &self.operator
    }

    pub fn inputs(&self) -> &[PlanRef] {
        &self.inputs
    }

    pub fn logical_prop(&self) -> &LogicalProperty {
        self.logical_prop.get_or_init(|| {
            let output = self.operator.derive_output(&self.inputs);
            let references = self
                .expressions()
                .iter()
                .flat_map(|e| e.references())
                .collect();
            LogicalProperty::new(output, references)
        })
    }

    pub fn output(&self) -> &[AttributeReference] {
        self.logical_prop().output()
    }

    pub fn output_set(&self) -> &AttributeSet {
        self.logical_prop().output_set()
    }

    /// Attributes consumed by expressions of this node, deduplicated by id in first occurrence
    /// order.
    pub fn references(&self) -> Vec<AttributeReference> {
        self.reference_set().iter().cloned().collect()
    }

    pub fn reference_set(&self) -> &AttributeSet {
        self.logical_prop().references()
    }

    pub fn reference_ids(&self) -> Vec<ExprId> {
        self.reference_set().ids()
    }

    pub fn schema(&self) -> Schema {
        self.logical_prop().schema()
    }

    /// Union of the outputs of all inputs.
    pub fn input_set(&self) -> AttributeSet {
        self.inputs
            .iter()
            .flat_map(|input| input.output().iter().cloned())
            .collect()
    }

    pub fn produced_attributes(&self) -> AttributeSet {
        self.operator.produced_attributes()
    }

    /// References that are neither produced by an input nor introduced by this node.
    pub fn missing_input(&self) -> AttributeSet {
        self.reference_set()
            .subtract(&self.input_set())
            .subtract(&self.produced_attributes())
    }

    /// Expressions embedded in this node, excluding the ones of its inputs.
    pub fn expressions(&self) -> Vec<ExprRef> {
        self.operator.expressions()
    }

    /// Rebuilds this node with `exprs` substituted positionally for [`PlanNode::expressions`].
    ///
    /// Returns this very node if every new expression is reference identical to the one it
    /// replaces.
    pub fn with_expressions(self: &Arc<Self>, exprs: Vec<ExprRef>) -> QuartziteResult<PlanRef> {
        let current = self.expressions();
        check_arity(self.node_name(), "expressions", current.len(), exprs.len())?;

        if current.iter().zip(&exprs).all(|(old, new)| old.same(new)) {
            return Ok(Arc::clone(self));
        }

        let operator = self.operator.with_new_expressions(exprs)?;
        Ok(Arc::new(Self::new_unchecked(operator, self.inputs.clone())))
    }

    pub fn map_expressions<F>(self: &Arc<Self>, f: F) -> QuartziteResult<PlanRef>
    where
        F: FnMut(&ExprRef) -> QuartziteResult<ExprRef>,
    {
        let exprs = self
            .expressions()
            .iter()
            .map(f)
            .collect::<QuartziteResult<Vec<_>>>()?;
        self.with_expressions(exprs)
    }

    /// Applies `rule` pre-order to every expression of this node.
    pub fn transform_expressions_down<F>(self: &Arc<Self>, rule: &mut F) -> QuartziteResult<PlanRef>
    where
        F: FnMut(&ExprRef) -> QuartziteResult<ExprRef>,
    {
        self.map_expressions(|e| e.transform_down(&mut *rule))
    }

    /// Applies `rule` post-order to every expression of this node.
    pub fn transform_expressions_up<F>(self: &Arc<Self>, rule: &mut F) -> QuartziteResult<PlanRef>
    where
        F: FnMut(&ExprRef) -> QuartziteResult<ExprRef>,
    {
        self.map_expressions(|e| e.transform_up(&mut *rule))
    }

    /// Values produced by `f` for every expression node of this plan node, pre-order.
    pub fn collect_from_expressions_down<T, F>(&self, mut f: F) -> Vec<T>
    where
        F: FnMut(&ExprRef) -> Option<T>,
    {
        self.expressions()
            .iter()
            .flat_map(|e| e.collect_down(&mut f))
            .collect()
    }

    /// Values produced by `f` for every expression node of this plan node, post-order.
    pub fn collect_from_expressions_up<T, F>(&self, mut f: F) -> Vec<T>
    where
        F: FnMut(&ExprRef) -> Option<T>,
    {
        self.expressions()
            .iter()
            .flat_map(|e| e.collect_up(&mut f))
            .collect()
    }
}

impl TreeNode for PlanNode {
    fn children(&self) -> Children<Self> {
        self.inputs.iter().cloned().collect()
    }

    fn with_new_children(&self, children: Vec<Arc<Self>>) -> QuartziteResult<Self> {
        check_arity(self.node_name(), "inputs", self.inputs.len(), children.len())?;
        Ok(Self::new_unchecked(self.operator.clone(), children))
    }

    fn node_name(&self) -> &str {
        self.operator.as_ref()
    }

    fn display_fields(&self) -> Vec<(&'static str, String)> {
        self.operator.display_fields()
    }
}
