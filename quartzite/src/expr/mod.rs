//! Scalar expressions embedded in plan nodes.
//!
//! Expressions form a tree of their own and implement [`TreeNode`]. Named expressions, i.e.
//! [`AttributeReference`] and [`Alias`], carry an [`ExprId`] which identifies the value they
//! introduce independently of its display name.
mod attribute;
pub use attribute::*;
mod alias;
pub use alias::*;
mod scalar;
pub use scalar::*;
mod sort;
pub use sort::*;
mod aggregate;
pub use aggregate::*;
mod predicate;
pub use predicate::*;

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arrow_schema::DataType;
use datafusion_common::ScalarValue;
use datafusion_expr::{AggregateFunction, Operator};
use enum_as_inner::EnumAsInner;
use enum_dispatch::enum_dispatch;
use strum_macros::IntoStaticStr;

use crate::error::{QuartziteError, QuartziteResult};
pub use crate::tree::Children;
use crate::tree::TreeNode;

pub type ExprRef = Arc<Expr>;

static NEXT_EXPR_ID: AtomicU64 = AtomicU64::new(1);

/// Process unique identity of a named expression.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, derive_more::Display)]
#[display(fmt = "{}", _0)]
pub struct ExprId(u64);

impl ExprId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        ExprId(NEXT_EXPR_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps a raw id. Ids built this way are not reserved against [`ExprId::next`].
    pub fn new(id: u64) -> Self {
        ExprId(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

#[enum_dispatch(Expr)]
pub trait ExprTrait {
    /// Child expressions in declaration order.
    fn operands(&self) -> Children<Expr>;

    fn with_operands(&self, operands: Vec<ExprRef>) -> QuartziteResult<Expr>;

    fn data_type(&self) -> DataType;

    fn nullable(&self) -> bool;

    /// Non child arguments, used in tree captions.
    fn fields(&self) -> Vec<(&'static str, String)>;
}

#[enum_dispatch]
#[derive(Clone, Debug, Hash, Eq, PartialEq, EnumAsInner, IntoStaticStr)]
pub enum Expr {
    Attribute(AttributeReference),
    Alias(Alias),
    Literal(Literal),
    Binary(BinaryExpr),
    Not(Not),
    IsNull(IsNull),
    SortOrder(SortOrder),
    AggregateCall(AggregateCall),
}

impl Expr {
    /// Whether this expression introduces or refers to a named value.
    pub fn is_named(&self) -> bool {
        matches!(self, Expr::Attribute(_) | Expr::Alias(_))
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, Expr::Attribute(_))
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, Expr::Alias(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Expr::Literal(_))
    }

    pub fn is_sort_order(&self) -> bool {
        matches!(self, Expr::SortOrder(_))
    }

    pub fn expr_id(&self) -> Option<ExprId> {
        match self {
            Expr::Attribute(a) => Some(a.expr_id()),
            Expr::Alias(a) => Some(a.expr_id()),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Expr::Attribute(a) => Some(a.name()),
            Expr::Alias(a) => Some(a.name()),
            _ => None,
        }
    }

    /// The attribute a parent plan sees for this named expression.
    pub fn to_attribute(&self) -> Option<AttributeReference> {
        match self {
            Expr::Attribute(a) => Some(a.clone()),
            Expr::Alias(a) => Some(a.to_attribute()),
            _ => None,
        }
    }

    /// Copy of a named expression carrying `expr_id`, every other field is preserved.
    pub fn with_expr_id(&self, expr_id: ExprId) -> Option<Expr> {
        match self {
            Expr::Attribute(a) => Some(a.with_expr_id(expr_id).into()),
            Expr::Alias(a) => Some(a.with_expr_id(expr_id).into()),
            _ => None,
        }
    }

    /// Attributes read by this expression.
    ///
    /// An alias does not reference itself, only what its child reads.
    pub fn references(self: &Arc<Self>) -> AttributeSet {
        self.collect_down(|e| e.as_attribute().cloned())
            .into_iter()
            .collect()
    }

    pub fn is_true_literal(&self) -> bool {
        matches!(self, Expr::Literal(l) if l.value() == &ScalarValue::Boolean(Some(true)))
    }

    pub fn is_false_literal(&self) -> bool {
        matches!(self, Expr::Literal(l) if l.value() == &ScalarValue::Boolean(Some(false)))
    }
}

impl TreeNode for Expr {
    fn children(&self) -> Children<Self> {
        self.operands()
    }

    fn with_new_children(&self, children: Vec<Arc<Self>>) -> QuartziteResult<Self> {
        self.with_operands(children)
    }

    fn node_name(&self) -> &str {
        let name: &'static str = self.into();
        name
    }

    fn display_fields(&self) -> Vec<(&'static str, String)> {
        self.fields()
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Attribute(a) => write!(f, "{}", a),
            Expr::Alias(a) => write!(f, "{}", a),
            Expr::Literal(l) => write!(f, "{}", l),
            Expr::Binary(b) => write!(f, "{}", b),
            Expr::Not(n) => write!(f, "{}", n),
            Expr::IsNull(n) => write!(f, "{}", n),
            Expr::SortOrder(s) => write!(f, "{}", s),
            Expr::AggregateCall(a) => write!(f, "{}", a),
        }
    }
}

/// Splits `operands` into exactly `N` children.
pub(crate) fn exact_operands<const N: usize>(
    node: &str,
    operands: Vec<ExprRef>,
) -> QuartziteResult<[ExprRef; N]> {
    let actual = operands.len();
    <[ExprRef; N]>::try_from(operands).map_err(|_| QuartziteError::ArityMismatch {
        node: node.to_string(),
        kind: "children",
        expected: N,
        actual,
    })
}

pub fn col(attr: &AttributeReference) -> ExprRef {
    Arc::new(attr.clone().into())
}

pub fn lit<V: Into<ScalarValue>>(value: V) -> ExprRef {
    Arc::new(Literal::new(value.into()).into())
}

pub fn binary(left: ExprRef, op: Operator, right: ExprRef) -> ExprRef {
    Arc::new(BinaryExpr::new(left, op, right).into())
}

pub fn and(left: ExprRef, right: ExprRef) -> ExprRef {
    binary(left, Operator::And, right)
}

pub fn or(left: ExprRef, right: ExprRef) -> ExprRef {
    binary(left, Operator::Or, right)
}

pub fn not(child: ExprRef) -> ExprRef {
    Arc::new(Not::new(child).into())
}

pub fn is_null(child: ExprRef) -> ExprRef {
    Arc::new(IsNull::new(child).into())
}

/// User visible alias with a freshly allocated id.
pub fn alias<S: Into<String>>(child: ExprRef, name: S) -> ExprRef {
    Arc::new(Alias::new(child, name).into())
}

/// Alias introduced by the optimizer itself rather than by the query.
pub fn internal_alias<S: Into<String>>(child: ExprRef, name: S) -> ExprRef {
    Arc::new(Alias::internal(child, name).into())
}

pub fn sort_order(child: ExprRef, asc: bool, nulls_first: bool) -> ExprRef {
    Arc::new(SortOrder::new(child, asc, nulls_first).into())
}

pub fn aggregate(func: AggregateFunction, args: Vec<ExprRef>) -> ExprRef {
    Arc::new(AggregateCall::new(func, args, false).into())
}
