use std::fmt::{Display, Formatter};

use arrow_schema::DataType;
use datafusion_common::ScalarValue;
use datafusion_expr::Operator;
use smallvec::smallvec;

use crate::error::{check_arity, QuartziteResult};
use crate::expr::{exact_operands, Children, Expr, ExprRef, ExprTrait};

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Literal {
    value: ScalarValue,
}

impl Literal {
    pub fn new(value: ScalarValue) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &ScalarValue {
        &self.value
    }
}

impl ExprTrait for Literal {
    fn operands(&self) -> Children<Expr> {
        Children::new()
    }

    fn with_operands(&self, operands: Vec<ExprRef>) -> QuartziteResult<Expr> {
        check_arity("Literal", "children", 0, operands.len())?;
        Ok(self.clone().into())
    }

    fn data_type(&self) -> DataType {
        self.value.get_datatype()
    }

    fn nullable(&self) -> bool {
        self.value.is_null()
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![("value", self.value.to_string())]
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct BinaryExpr {
    left: ExprRef,
    op: Operator,
    right: ExprRef,
}

impl BinaryExpr {
    pub fn new(left: ExprRef, op: Operator, right: ExprRef) -> Self {
        Self { left, op, right }
    }

    pub fn left(&self) -> &ExprRef {
        &self.left
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn right(&self) -> &ExprRef {
        &self.right
    }

    fn returns_boolean(&self) -> bool {
        matches!(
            self.op,
            Operator::Eq
                | Operator::NotEq
                | Operator::Lt
                | Operator::LtEq
                | Operator::Gt
                | Operator::GtEq
                | Operator::And
                | Operator::Or
                | Operator::IsDistinctFrom
                | Operator::IsNotDistinctFrom
                | Operator::RegexMatch
                | Operator::RegexIMatch
                | Operator::RegexNotMatch
                | Operator::RegexNotIMatch
        )
    }
}

impl ExprTrait for BinaryExpr {
    fn operands(&self) -> Children<Expr> {
        smallvec![self.left.clone(), self.right.clone()]
    }

    fn with_operands(&self, operands: Vec<ExprRef>) -> QuartziteResult<Expr> {
        let [left, right] = exact_operands("Binary", operands)?;
        Ok(BinaryExpr::new(left, self.op, right).into())
    }

    fn data_type(&self) -> DataType {
        if self.returns_boolean() {
            DataType::Boolean
        } else {
            self.left.data_type()
        }
    }

    fn nullable(&self) -> bool {
        match self.op {
            Operator::IsDistinctFrom | Operator::IsNotDistinctFrom => false,
            _ => self.left.nullable() || self.right.nullable(),
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![("op", self.op.to_string())]
    }
}

impl Display for BinaryExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.left, self.op, self.right)
    }
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Not {
    child: ExprRef,
}

impl Not {
    pub fn new(child: ExprRef) -> Self {
        Self { child }
    }

    pub fn child(&self) -> &ExprRef {
        &self.child
    }
}

impl ExprTrait for Not {
    fn operands(&self) -> Children<Expr> {
        smallvec![self.child.clone()]
    }

    fn with_operands(&self, operands: Vec<ExprRef>) -> QuartziteResult<Expr> {
        let [child] = exact_operands("Not", operands)?;
        Ok(Not::new(child).into())
    }

    fn data_type(&self) -> DataType {
        DataType::Boolean
    }

    fn nullable(&self) -> bool {
        self.child.nullable()
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![]
    }
}

impl Display for Not {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "NOT {}", self.child)
    }
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct IsNull {
    child: ExprRef,
}

impl IsNull {
    pub fn new(child: ExprRef) -> Self {
        Self { child }
    }

    pub fn child(&self) -> &ExprRef {
        &self.child
    }
}

impl ExprTrait for IsNull {
    fn operands(&self) -> Children<Expr> {
        smallvec![self.child.clone()]
    }

    fn with_operands(&self, operands: Vec<ExprRef>) -> QuartziteResult<Expr> {
        let [child] = exact_operands("IsNull", operands)?;
        Ok(IsNull::new(child).into())
    }

    fn data_type(&self) -> DataType {
        DataType::Boolean
    }

    fn nullable(&self) -> bool {
        false
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![]
    }
}

impl Display for IsNull {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} IS NULL", self.child)
    }
}
