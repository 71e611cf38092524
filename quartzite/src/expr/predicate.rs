use datafusion_expr::Operator;

use crate::expr::{and, Expr, ExprRef};

/// Flattens nested `AND`s into their conjuncts, left to right.
pub fn split_conjunction(predicate: &ExprRef) -> Vec<ExprRef> {
    match &**predicate {
        Expr::Binary(b) if b.op() == Operator::And => {
            let mut conjuncts = split_conjunction(b.left());
            conjuncts.extend(split_conjunction(b.right()));
            conjuncts
        }
        _ => vec![predicate.clone()],
    }
}

/// Joins predicates with `AND`, returns `None` for an empty input.
pub fn conjunction<I: IntoIterator<Item = ExprRef>>(predicates: I) -> Option<ExprRef> {
    predicates.into_iter().reduce(and)
}
