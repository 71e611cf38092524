use std::fmt::{Display, Formatter};

use arrow_schema::DataType;
use smallvec::smallvec;

use crate::error::QuartziteResult;
use crate::expr::{exact_operands, Children, Expr, ExprRef, ExprTrait};

/// Ordering key of a sort.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct SortOrder {
    child: ExprRef,
    asc: bool,
    nulls_first: bool,
}

impl SortOrder {
    pub fn new(child: ExprRef, asc: bool, nulls_first: bool) -> Self {
        Self {
            child,
            asc,
            nulls_first,
        }
    }

    pub fn child(&self) -> &ExprRef {
        &self.child
    }

    pub fn asc(&self) -> bool {
        self.asc
    }

    pub fn nulls_first(&self) -> bool {
        self.nulls_first
    }
}

impl ExprTrait for SortOrder {
    fn operands(&self) -> Children<Expr> {
        smallvec![self.child.clone()]
    }

    fn with_operands(&self, operands: Vec<ExprRef>) -> QuartziteResult<Expr> {
        let [child] = exact_operands("SortOrder", operands)?;
        Ok(SortOrder::new(child, self.asc, self.nulls_first).into())
    }

    fn data_type(&self) -> DataType {
        self.child.data_type()
    }

    fn nullable(&self) -> bool {
        self.child.nullable()
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("asc", self.asc.to_string()),
            ("nulls_first", self.nulls_first.to_string()),
        ]
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.child,
            if self.asc { "ASC" } else { "DESC" },
            if self.nulls_first {
                "NULLS FIRST"
            } else {
                "NULLS LAST"
            }
        )
    }
}
