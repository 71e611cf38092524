use std::sync::Arc;

use crate::error::QuartziteResult;
use crate::plan::PlanRef;
use crate::rules::{Rule, RuleId};

type RuleFn = dyn Fn(&PlanRef) -> QuartziteResult<PlanRef> + Send + Sync;

/// Named rule backed by a closure.
#[derive(Clone)]
pub struct FnRule {
    name: String,
    func: Arc<RuleFn>,
}

impl FnRule {
    pub fn new<S, F>(name: S, func: F) -> Self
    where
        S: Into<String>,
        F: Fn(&PlanRef) -> QuartziteResult<PlanRef> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }
}

impl Rule for FnRule {
    fn apply(&self, plan: &PlanRef) -> QuartziteResult<PlanRef> {
        (self.func)(plan)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn rule_id(&self) -> Option<RuleId> {
        None
    }
}
