use std::fmt::{Display, Formatter};

use arrow_schema::DataType;
use datafusion_expr::AggregateFunction;
use itertools::Itertools;

use crate::error::{check_arity, QuartziteResult};
use crate::expr::{Children, Expr, ExprRef, ExprTrait};

/// Call of an aggregate function, only meaningful inside an aggregate plan node.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct AggregateCall {
    func: AggregateFunction,
    args: Vec<ExprRef>,
    distinct: bool,
}

impl AggregateCall {
    pub fn new(func: AggregateFunction, args: Vec<ExprRef>, distinct: bool) -> Self {
        Self {
            func,
            args,
            distinct,
        }
    }

    pub fn func(&self) -> &AggregateFunction {
        &self.func
    }

    pub fn args(&self) -> &[ExprRef] {
        &self.args
    }

    pub fn distinct(&self) -> bool {
        self.distinct
    }
}

impl ExprTrait for AggregateCall {
    fn operands(&self) -> Children<Expr> {
        self.args.iter().cloned().collect()
    }

    fn with_operands(&self, operands: Vec<ExprRef>) -> QuartziteResult<Expr> {
        check_arity("AggregateCall", "children", self.args.len(), operands.len())?;
        Ok(AggregateCall::new(self.func.clone(), operands, self.distinct).into())
    }

    fn data_type(&self) -> DataType {
        match self.func {
            AggregateFunction::Count => DataType::Int64,
            AggregateFunction::Avg => DataType::Float64,
            _ => self
                .args
                .first()
                .map(|a| a.data_type())
                .unwrap_or(DataType::Null),
        }
    }

    fn nullable(&self) -> bool {
        !matches!(self.func, AggregateFunction::Count)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("func", self.func.to_string())];
        if self.distinct {
            fields.push(("distinct", "true".to_string()));
        }
        fields
    }
}

impl Display for AggregateCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}{})",
            self.func,
            if self.distinct { "DISTINCT " } else { "" },
            self.args.iter().join(", ")
        )
    }
}
