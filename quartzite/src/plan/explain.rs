use std::io::{BufWriter, Write};

use crate::error::QuartziteResult;
use crate::normalize::normalize_expr_ids;
use crate::plan::PlanRef;
use crate::tree::write_tree;

pub fn explain<W: Write>(plan: &PlanRef, output: &mut W) -> std::io::Result<()> {
    write_tree(plan, output)
}

pub fn explain_to_string(plan: &PlanRef) -> std::io::Result<String> {
    let mut buf = BufWriter::new(Vec::new());
    explain(plan, &mut buf)?;

    let bytes = buf.into_inner()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Explains `plan` after renumbering its expression ids from zero, so that the output only
/// depends on the shape of the plan and not on the order in which ids were allocated.
pub fn explain_normalized(plan: &PlanRef) -> QuartziteResult<String> {
    let normalized = normalize_expr_ids(plan)?;
    Ok(explain_to_string(&normalized)?)
}
