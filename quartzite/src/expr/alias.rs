use std::fmt::{Display, Formatter};

use arrow_schema::DataType;

use smallvec::smallvec;

use crate::error::QuartziteResult;
use crate::expr::{
    exact_operands, AttributeReference, Children, Expr, ExprId, ExprRef, ExprTrait,
};

/// Binds a name and a new [`ExprId`] to the value of its child.
///
/// Internal aliases are produced by the optimizer itself, for example when a common
/// subexpression is pulled out, and never appear in the query text.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Alias {
    child: ExprRef,
    name: String,
    expr_id: ExprId,
    internal: bool,
}

impl Alias {
    pub fn new<S: Into<String>>(child: ExprRef, name: S) -> Self {
        Self {
            child,
            name: name.into(),
            expr_id: ExprId::next(),
            internal: false,
        }
    }

    pub fn internal<S: Into<String>>(child: ExprRef, name: S) -> Self {
        Self {
            internal: true,
            ..Self::new(child, name)
        }
    }

    pub fn child(&self) -> &ExprRef {
        &self.child
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expr_id(&self) -> ExprId {
        self.expr_id
    }

    pub fn is_internal(&self) -> bool {
        self.internal
    }

    pub fn with_expr_id(&self, expr_id: ExprId) -> Self {
        Self {
            expr_id,
            ..self.clone()
        }
    }

    pub fn to_attribute(&self) -> AttributeReference {
        AttributeReference::with_id(
            &self.name,
            self.child.data_type(),
            self.child.nullable(),
            self.expr_id,
        )
    }
}

impl ExprTrait for Alias {
    fn operands(&self) -> Children<Expr> {
        smallvec![self.child.clone()]
    }

    fn with_operands(&self, operands: Vec<ExprRef>) -> QuartziteResult<Expr> {
        let [child] = exact_operands("Alias", operands)?;
        Ok(Alias {
            child,
            ..self.clone()
        }
        .into())
    }

    fn data_type(&self) -> DataType {
        self.child.data_type()
    }

    fn nullable(&self) -> bool {
        self.child.nullable()
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("expr_id", self.expr_id.to_string()),
        ];
        if self.internal {
            fields.push(("internal", "true".to_string()));
        }
        fields
    }
}

impl Display for Alias {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} AS {}#{}", self.child, self.name, self.expr_id)
    }
}
