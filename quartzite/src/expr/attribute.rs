use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use arrow_schema::{DataType, Field};
use itertools::Itertools;

use crate::error::QuartziteResult;
use crate::expr::{Children, Expr, ExprId, ExprRef, ExprTrait};

/// A named, typed output slot of a plan node.
///
/// Two attributes with the same [`ExprId`] denote the same slot, whatever their display name.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct AttributeReference {
    name: String,
    data_type: DataType,
    nullable: bool,
    expr_id: ExprId,
    qualifier: Option<String>,
}

impl AttributeReference {
    /// Creates an attribute with a freshly allocated expression id.
    pub fn new<S: Into<String>>(name: S, data_type: DataType, nullable: bool) -> Self {
        Self::with_id(name, data_type, nullable, ExprId::next())
    }

    pub fn with_id<S: Into<String>>(
        name: S,
        data_type: DataType,
        nullable: bool,
        expr_id: ExprId,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
            expr_id,
            qualifier: None,
        }
    }

    pub fn from_field(field: &Field) -> Self {
        Self::new(field.name(), field.data_type().clone(), field.is_nullable())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expr_id(&self) -> ExprId {
        self.expr_id
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    pub fn with_expr_id(&self, expr_id: ExprId) -> Self {
        Self {
            expr_id,
            ..self.clone()
        }
    }

    pub fn with_nullability(&self, nullable: bool) -> Self {
        Self {
            nullable,
            ..self.clone()
        }
    }

    pub fn with_qualifier<S: Into<String>>(&self, qualifier: S) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            ..self.clone()
        }
    }

    pub fn to_field(&self) -> Field {
        Field::new(&self.name, self.data_type.clone(), self.nullable)
    }
}

impl ExprTrait for AttributeReference {
    fn operands(&self) -> Children<Expr> {
        Children::new()
    }

    fn with_operands(&self, operands: Vec<ExprRef>) -> QuartziteResult<Expr> {
        crate::error::check_arity("Attribute", "children", 0, operands.len())?;
        Ok(self.clone().into())
    }

    fn data_type(&self) -> DataType {
        self.data_type.clone()
    }

    fn nullable(&self) -> bool {
        self.nullable
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.to_string()),
            ("data_type", self.data_type.to_string()),
        ]
    }
}

impl Display for AttributeReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}.{}#{}", q, self.name, self.expr_id),
            None => write!(f, "{}#{}", self.name, self.expr_id),
        }
    }
}

/// Attributes deduplicated by expression id, in first occurrence order.
#[derive(Clone, Debug, Default)]
pub struct AttributeSet {
    attrs: Vec<AttributeReference>,
    ids: HashSet<ExprId>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if an attribute with the same id is already present.
    pub fn insert(&mut self, attr: AttributeReference) -> bool {
        if self.ids.insert(attr.expr_id()) {
            self.attrs.push(attr);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, attr: &AttributeReference) -> bool {
        self.contains_id(attr.expr_id())
    }

    pub fn contains_id(&self, expr_id: ExprId) -> bool {
        self.ids.contains(&expr_id)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeReference> {
        self.attrs.iter()
    }

    pub fn ids(&self) -> Vec<ExprId> {
        self.attrs.iter().map(|a| a.expr_id()).collect()
    }

    pub fn union(&self, other: &AttributeSet) -> AttributeSet {
        self.iter().chain(other.iter()).cloned().collect()
    }

    /// Attributes of `self` whose id is not in `other`.
    pub fn subtract(&self, other: &AttributeSet) -> AttributeSet {
        self.iter().filter(|a| !other.contains(a)).cloned().collect()
    }

    pub fn is_subset_of(&self, other: &AttributeSet) -> bool {
        self.iter().all(|a| other.contains(a))
    }
}

/// Sets are equal when they hold the same ids, regardless of order.
impl PartialEq for AttributeSet {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids
    }
}

impl Eq for AttributeSet {}

impl FromIterator<AttributeReference> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = AttributeReference>>(iter: T) -> Self {
        let mut set = AttributeSet::new();
        for attr in iter {
            set.insert(attr);
        }
        set
    }
}

impl IntoIterator for AttributeSet {
    type Item = AttributeReference;
    type IntoIter = std::vec::IntoIter<AttributeReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.attrs.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a AttributeReference;
    type IntoIter = std::slice::Iter<'a, AttributeReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.attrs.iter()
    }
}

impl Display for AttributeSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.attrs.iter().join(", "))
    }
}
