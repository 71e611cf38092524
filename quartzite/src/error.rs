use thiserror::Error;

use crate::expr::ExprId;

pub type QuartziteResult<T> = Result<T, QuartziteError>;

#[derive(Debug, Error)]
pub enum QuartziteError {
    /// A node was rebuilt from a children or expression list of the wrong length.
    #[error("{node} expects {expected} {kind}, but got {actual}")]
    ArityMismatch {
        node: String,
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("batch {batch:?} did not reach a fixed point within {max_iterations} iterations")]
    NonConvergence { batch: String, max_iterations: usize },
    #[error("unresolved reference {name}#{expr_id}")]
    UnresolvedReference { name: String, expr_id: ExprId },
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
    #[error("once batch {batch:?} is not idempotent")]
    NonIdempotentBatch { batch: String },
    #[error("plan produced by batch {batch:?} is not integral: {detail}")]
    PlanIntegrity { batch: String, detail: String },
    #[error("invalid executor configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Error raised from inside a rule.
    #[error(transparent)]
    Rule(#[from] anyhow::Error),
}

pub(crate) fn check_arity(
    node: &str,
    kind: &'static str,
    expected: usize,
    actual: usize,
) -> QuartziteResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(QuartziteError::ArityMismatch {
            node: node.to_string(),
            kind,
            expected,
            actual,
        })
    }
}
