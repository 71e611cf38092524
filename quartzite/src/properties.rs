//! Logical properties of plan nodes.
//!
//! Logical properties are things shared by logically equivalent plans: the attributes a node
//! outputs and the attributes it consumes. They are derived from the node's operator and inputs,
//! and cached on the node the first time they are requested.
use arrow_schema::{Field, Schema};

use crate::expr::{AttributeReference, AttributeSet};

#[derive(Clone, Debug, PartialEq)]
pub struct LogicalProperty {
    output: Vec<AttributeReference>,
    output_set: AttributeSet,
    references: AttributeSet,
}

impl LogicalProperty {
    pub fn new(output: Vec<AttributeReference>, references: AttributeSet) -> Self {
        let output_set = output.iter().cloned().collect();
        Self {
            output,
            output_set,
            references,
        }
    }

    /// Attributes visible to parents, in order.
    pub fn output(&self) -> &[AttributeReference] {
        &self.output
    }

    pub fn output_set(&self) -> &AttributeSet {
        &self.output_set
    }

    /// Attributes consumed by the node's own expressions.
    pub fn references(&self) -> &AttributeSet {
        &self.references
    }

    pub fn schema(&self) -> Schema {
        Schema::new(
            self.output
                .iter()
                .map(AttributeReference::to_field)
                .collect::<Vec<Field>>(),
        )
    }
}
