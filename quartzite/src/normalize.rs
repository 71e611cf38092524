//! Expression id canonicalization.
//!
//! Expression ids are allocated from a process wide counter, so two plans built the same way at
//! different times carry different ids. [`ExprIdNormalizer`] renumbers every participating named
//! expression densely from zero, in order of first occurrence during a post-order walk of the
//! plan, after which structurally equivalent plans compare equal.
use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use log::trace;

use crate::error::{QuartziteError, QuartziteResult};
use crate::expr::{Expr, ExprId, ExprRef};
use crate::plan::PlanRef;
use crate::tree::TreeNode;

/// Renumbers expression ids of the expressions accepted by its predicate.
///
/// The default predicate accepts every named expression, i.e. attribute references and aliases,
/// internal aliases included.
pub struct ExprIdNormalizer<P = fn(&Expr) -> bool> {
    participates: P,
}

impl Default for ExprIdNormalizer {
    fn default() -> Self {
        Self {
            participates: Expr::is_named,
        }
    }
}

impl<P> ExprIdNormalizer<P>
where
    P: Fn(&Expr) -> bool,
{
    /// Normalizer only renumbering expressions for which `participates` holds. Every accepted
    /// expression must be named.
    pub fn new(participates: P) -> Self {
        Self { participates }
    }

    /// Renumbers participating ids densely, in order of first occurrence.
    ///
    /// The mapping is applied to every named expression carrying a participating id, whether or
    /// not the predicate accepts that expression itself, so an alias stays in sync with the
    /// attributes referring to it. Ids held only by non participating expressions are kept and
    /// never handed out to participating ones.
    pub fn normalize(&self, plan: &PlanRef) -> QuartziteResult<PlanRef> {
        let mut first_seen = Vec::new();
        let mut reserved = HashSet::new();
        for (expr, participates) in self.collect_candidates(plan) {
            match (expr.expr_id(), participates) {
                (Some(expr_id), true) => first_seen.push(expr_id),
                (Some(expr_id), false) => {
                    reserved.insert(expr_id);
                }
                (None, _) => {
                    return Err(QuartziteError::InvalidPlan(format!(
                        "expression {} takes part in id normalization but has no id",
                        expr
                    )))
                }
            }
        }

        let first_seen = first_seen.into_iter().unique().collect::<Vec<_>>();
        for expr_id in &first_seen {
            reserved.remove(expr_id);
        }
        let fresh_ids = (0u64..)
            .map(ExprId::new)
            .filter(|expr_id| !reserved.contains(expr_id));
        let mapping: HashMap<ExprId, ExprId> = first_seen.into_iter().zip(fresh_ids).collect();
        trace!("Normalizing {} expression ids, keeping {}", mapping.len(), reserved.len());

        let mut rewrite = |e: &ExprRef| -> QuartziteResult<ExprRef> {
            let expr_id = match e.expr_id() {
                Some(expr_id) => expr_id,
                None => return Ok(e.clone()),
            };
            let new_id = match mapping.get(&expr_id) {
                Some(new_id) => *new_id,
                None if (self.participates)(&**e) => {
                    return Err(QuartziteError::UnresolvedReference {
                        name: e.name().unwrap_or_default().to_string(),
                        expr_id,
                    })
                }
                None => return Ok(e.clone()),
            };
            if new_id == expr_id {
                return Ok(e.clone());
            }
            match e.with_expr_id(new_id) {
                Some(renumbered) => Ok(ExprRef::new(renumbered)),
                None => Ok(e.clone()),
            }
        };

        plan.transform_down(&mut |node| node.transform_expressions_down(&mut rewrite))
    }

    /// Named or participating expressions of the whole tree in post-order, duplicates included,
    /// paired with whether they participate.
    fn collect_candidates(&self, plan: &PlanRef) -> Vec<(ExprRef, bool)> {
        plan.fold_up(Vec::new(), &mut |mut acc, node| {
            acc.extend(node.collect_from_expressions_up(|e| {
                let participates = (self.participates)(&**e);
                (participates || e.is_named()).then(|| (e.clone(), participates))
            }));
            acc
        })
    }
}

/// Normalizes `plan` with the default normalizer.
pub fn normalize_expr_ids(plan: &PlanRef) -> QuartziteResult<PlanRef> {
    let normalizer: ExprIdNormalizer = Default::default();
    normalizer.normalize(plan)
}

/// Whether two plans are equal up to a consistent renaming of expression ids.
pub fn plans_equivalent(left: &PlanRef, right: &PlanRef) -> QuartziteResult<bool> {
    Ok(normalize_expr_ids(left)? == normalize_expr_ids(right)?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow_schema::DataType;
    use datafusion_expr::Operator;

    use crate::error::QuartziteError;
    use crate::expr::{alias, binary, col, internal_alias, lit, AttributeReference, Expr, ExprId};
    use crate::normalize::{normalize_expr_ids, plans_equivalent, ExprIdNormalizer};
    use crate::plan::{LogicalPlanBuilder, PlanRef};
    use crate::tree::TreeNode;

    fn plan_with_id(id: u64) -> PlanRef {
        let a = AttributeReference::with_id("a", DataType::Int32, false, ExprId::new(id));
        LogicalPlanBuilder::scan("r", vec![a.clone()])
            .filter(binary(col(&a), Operator::Gt, lit(1)))
            .project(vec![alias(col(&a), "b")])
            .build()
            .unwrap()
    }

    #[test]
    fn test_renaming_invariance() {
        let p7 = plan_with_id(7);
        let p42 = plan_with_id(42);
        assert_ne!(p7, p42);

        let n7 = normalize_expr_ids(&p7).unwrap();
        let n42 = normalize_expr_ids(&p42).unwrap();

        assert_eq!(n7, n42);
        assert_eq!(vec![ExprId::new(0)], n7.reference_ids());
        assert_eq!(ExprId::new(1), n7.output()[0].expr_id());
        assert!(plans_equivalent(&p7, &p42).unwrap());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let plan = plan_with_id(7);

        let once = normalize_expr_ids(&plan).unwrap();
        let twice = normalize_expr_ids(&once).unwrap();

        assert_eq!(once, twice);
        assert!(once.same(&twice));
    }

    #[test]
    fn test_first_occurrence_order_not_numeric_order() {
        let x = AttributeReference::with_id("x", DataType::Int32, false, ExprId::new(9));
        let y = AttributeReference::with_id("y", DataType::Int32, false, ExprId::new(3));
        let plan = LogicalPlanBuilder::scan("r", vec![x.clone(), y.clone()])
            .project(vec![col(&y), col(&x)])
            .build()
            .unwrap();

        let normalized = normalize_expr_ids(&plan).unwrap();

        assert_eq!(
            vec![("y", ExprId::new(1)), ("x", ExprId::new(0))],
            normalized
                .output()
                .iter()
                .map(|a| (a.name(), a.expr_id()))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_internal_alias_participates() {
        let a = AttributeReference::with_id("a", DataType::Int32, false, ExprId::new(5));
        let plan = LogicalPlanBuilder::scan("r", vec![a.clone()])
            .project(vec![internal_alias(col(&a), "_tmp")])
            .build()
            .unwrap();

        let normalized = normalize_expr_ids(&plan).unwrap();

        assert_eq!(ExprId::new(1), normalized.output()[0].expr_id());
    }

    #[test]
    fn test_custom_predicate() {
        let a = AttributeReference::with_id("a", DataType::Int32, false, ExprId::new(5));
        let aliased = alias(col(&a), "b");
        let alias_id = aliased.expr_id().unwrap();
        let plan = LogicalPlanBuilder::scan("r", vec![a.clone()])
            .project(vec![aliased])
            .build()
            .unwrap();

        let normalized = ExprIdNormalizer::new(|e: &Expr| e.is_attribute())
            .normalize(&plan)
            .unwrap();

        assert_eq!(vec![ExprId::new(0)], normalized.reference_ids());
        assert_eq!(alias_id, normalized.output()[0].expr_id());
    }

    #[test]
    fn test_custom_predicate_renumbers_referenced_alias() {
        let a = AttributeReference::with_id("a", DataType::Int32, false, ExprId::new(5));
        let b = alias(binary(col(&a), Operator::Plus, lit(1)), "b");
        let b_attr = b.to_attribute().unwrap();
        let plan = LogicalPlanBuilder::scan("r", vec![a.clone()])
            .project(vec![b])
            .filter(binary(col(&b_attr), Operator::Gt, lit(0)))
            .build()
            .unwrap();

        let normalized = ExprIdNormalizer::new(|e: &Expr| e.is_attribute())
            .normalize(&plan)
            .unwrap();

        assert!(normalized.missing_input().is_empty());
        assert_eq!(vec![ExprId::new(1)], normalized.reference_ids());
        assert_eq!(ExprId::new(1), normalized.inputs()[0].output()[0].expr_id());
    }

    #[test]
    fn test_custom_predicate_keeps_ids_of_other_expressions() {
        let a = AttributeReference::with_id("a", DataType::Int32, false, ExprId::new(5));
        let b = Arc::new(alias(col(&a), "b").with_expr_id(ExprId::new(0)).unwrap());
        let plan = LogicalPlanBuilder::scan("r", vec![a.clone()])
            .project(vec![col(&a), b])
            .build()
            .unwrap();
        let normalizer = ExprIdNormalizer::new(|e: &Expr| e.is_attribute());

        let normalized = normalizer.normalize(&plan).unwrap();

        assert_eq!(
            vec![ExprId::new(1), ExprId::new(0)],
            normalized.output().iter().map(|a| a.expr_id()).collect::<Vec<_>>()
        );
        assert_eq!(2, normalized.output_set().len());
        assert!(normalizer.normalize(&normalized).unwrap().same(&normalized));
    }

    #[test]
    fn test_unnamed_participant_is_rejected() {
        let plan = plan_with_id(7);

        let result =
            ExprIdNormalizer::new(|e: &Expr| e.is_named() || e.is_literal()).normalize(&plan);

        assert!(matches!(result, Err(QuartziteError::InvalidPlan(_))));
    }
}
