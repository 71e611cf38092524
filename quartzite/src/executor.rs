//! Batch based rule executor.
//!
//! Rules are grouped into ordered [`Batch`]es. Each batch carries a [`Strategy`]: `Once` applies
//! every rule of the batch a single time, `FixedPoint` repeats full passes over the batch until a
//! pass leaves the plan reference identical, or until its iteration cap is exhausted. Batches run
//! strictly in declaration order, each consuming the plan the previous one produced.
//!
//! Rule errors are never caught, they abort execution and surface to the caller unchanged.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use enumset::EnumSet;
use log::{debug, log_enabled, trace, warn, Level};
use prettytable::{row, Table};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::error::{QuartziteError, QuartziteResult};
use crate::plan::PlanRef;
use crate::rules::{Rule, RuleId, RuleImpl};
use crate::tree::TreeNode;

/// Iteration cap of a fixed point batch, `None` meaning unlimited.
///
/// An unlimited batch asserts that its rules always converge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FixedPoint {
    max_iterations: Option<usize>,
}

impl FixedPoint {
    /// At most `max_iterations` passes. A cap of 0 is rejected with [`QuartziteError::Config`]
    /// when the batch is loaded or run.
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations: Some(max_iterations),
        }
    }

    pub fn unlimited() -> Self {
        Self {
            max_iterations: None,
        }
    }

    pub fn max_iterations(&self) -> Option<usize> {
        self.max_iterations
    }

    fn validate(&self, batch: &str) -> QuartziteResult<()> {
        match self.max_iterations {
            Some(0) => Err(QuartziteError::Config(format!(
                "fixed point batch {:?} must allow at least one iteration",
                batch
            ))),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Strategy {
    Once,
    FixedPoint(FixedPoint),
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Once => write!(f, "Once"),
            Strategy::FixedPoint(FixedPoint {
                max_iterations: Some(max),
            }) => write!(f, "FixedPoint({})", max),
            Strategy::FixedPoint(FixedPoint {
                max_iterations: None,
            }) => write!(f, "FixedPoint(Unlimited)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Batch {
    name: String,
    strategy: Strategy,
    rules: Vec<RuleImpl>,
}

impl Batch {
    pub fn new<S, I>(name: S, strategy: Strategy, rules: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = RuleImpl>,
    {
        Self {
            name: name.into(),
            strategy,
            rules: rules.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn rules(&self) -> &[RuleImpl] {
        &self.rules
    }
}

/// Optional checks and rule exclusions applied to every batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Re-run `Once` batches and fail if the second run still changes the plan.
    check_once_idempotence: bool,
    /// Fail if a batch produces a node referencing attributes its inputs do not provide.
    check_integrity: bool,
    /// Built-in rules skipped by every batch.
    #[serde(deserialize_with = "deserialize_rule_set")]
    excluded_rules: EnumSet<RuleId>,
}

impl ExecutorConfig {
    pub fn with_check_once_idempotence(mut self, enabled: bool) -> Self {
        self.check_once_idempotence = enabled;
        self
    }

    pub fn with_check_integrity(mut self, enabled: bool) -> Self {
        self.check_integrity = enabled;
        self
    }

    pub fn with_excluded_rules<I: IntoIterator<Item = RuleId>>(mut self, rules: I) -> Self {
        self.excluded_rules = rules.into_iter().collect();
        self
    }

    pub fn check_once_idempotence(&self) -> bool {
        self.check_once_idempotence
    }

    pub fn check_integrity(&self) -> bool {
        self.check_integrity
    }

    pub fn excluded_rules(&self) -> EnumSet<RuleId> {
        self.excluded_rules
    }
}

fn deserialize_rule_set<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<EnumSet<RuleId>, D::Error> {
    Vec::<String>::deserialize(deserializer)?
        .iter()
        .map(|name| RuleId::from_str(name).map_err(|_| D::Error::custom(unknown_rule(name))))
        .collect()
}

fn unknown_rule(name: &str) -> String {
    format!("unknown rule {:?}", name)
}

#[derive(Deserialize)]
struct BatchSpec {
    name: String,
    strategy: Strategy,
    #[serde(default)]
    rules: Vec<String>,
}

#[derive(Deserialize)]
struct ExecutorSpec {
    #[serde(default)]
    config: ExecutorConfig,
    batches: Vec<BatchSpec>,
}

/// What happened while running one batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReport {
    name: String,
    strategy: Strategy,
    iterations: usize,
    effective_rules: Vec<String>,
}

impl BatchReport {
    fn new(batch: &Batch) -> Self {
        Self {
            name: batch.name.clone(),
            strategy: batch.strategy,
            iterations: 0,
            effective_rules: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Number of full passes executed, the final non changing pass of a fixed point batch
    /// included.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Names of the rules that changed the plan, once per change, in application order.
    pub fn effective_rules(&self) -> &[String] {
        &self.effective_rules
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    batches: Vec<BatchReport>,
}

impl ExecutionReport {
    pub fn batches(&self) -> &[BatchReport] {
        &self.batches
    }
}

impl Display for ExecutionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut table = Table::new();
        table.add_row(row!["Batch", "Strategy", "Iterations", "Effective Rules"]);
        for batch in &self.batches {
            table.add_row(row![
                batch.name,
                batch.strategy,
                batch.iterations,
                batch.effective_rules.join(", ")
            ]);
        }

        write!(f, "{}", table)
    }
}

pub struct RulesExecutor {
    batches: Vec<Batch>,
    config: ExecutorConfig,
}

impl RulesExecutor {
    pub fn new(batches: Vec<Batch>) -> Self {
        Self {
            batches,
            config: ExecutorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds an executor from a yaml document of the form
    ///
    /// ```yaml
    /// config:
    ///   check_integrity: true
    ///   excluded_rules: [CombineLimits]
    /// batches:
    ///   - name: simplify
    ///     strategy:
    ///       type: fixed_point
    ///       max_iterations: 100
    ///     rules: [SimplifyBooleans, PruneTrueFilter]
    /// ```
    ///
    /// Only built-in rules can be named.
    pub fn from_yaml(yaml: &str) -> QuartziteResult<Self> {
        let spec: ExecutorSpec =
            serde_yaml::from_str(yaml).map_err(|e| QuartziteError::Config(e.to_string()))?;

        let batches = spec
            .batches
            .into_iter()
            .map(|batch| {
                let rules = batch
                    .rules
                    .iter()
                    .map(|name| {
                        RuleId::from_str(name)
                            .map(RuleImpl::builtin)
                            .map_err(|_| {
                                QuartziteError::Config(format!(
                                    "{} in batch {:?}",
                                    unknown_rule(name),
                                    batch.name
                                ))
                            })
                    })
                    .collect::<QuartziteResult<Vec<_>>>()?;
                if let Strategy::FixedPoint(fixed_point) = batch.strategy {
                    fixed_point.validate(&batch.name)?;
                }
                Ok(Batch::new(batch.name, batch.strategy, rules))
            })
            .collect::<QuartziteResult<Vec<_>>>()?;

        Ok(Self::new(batches).with_config(spec.config))
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn execute(&self, plan: &PlanRef) -> QuartziteResult<PlanRef> {
        self.execute_and_report(plan).map(|(plan, _)| plan)
    }

    pub fn execute_and_report(
        &self,
        plan: &PlanRef,
    ) -> QuartziteResult<(PlanRef, ExecutionReport)> {
        let mut current = plan.clone();
        let mut report = ExecutionReport::default();

        for batch in &self.batches {
            let (next, batch_report) = self.run_batch(batch, &current)?;
            if self.config.check_integrity {
                check_integrity(batch, &next)?;
            }
            current = next;
            report.batches.push(batch_report);
        }

        Ok((current, report))
    }

    fn run_batch(&self, batch: &Batch, plan: &PlanRef) -> QuartziteResult<(PlanRef, BatchReport)> {
        debug!("Running batch {:?} with strategy {}", batch.name, batch.strategy);
        let mut report = BatchReport::new(batch);

        let result = match batch.strategy {
            Strategy::Once => {
                let result = self.run_pass(batch, plan, &mut report)?;
                if self.config.check_once_idempotence {
                    let rerun = self.run_pass(batch, &result, &mut BatchReport::new(batch))?;
                    if !rerun.same(&result) {
                        return Err(QuartziteError::NonIdempotentBatch {
                            batch: batch.name.clone(),
                        });
                    }
                }
                result
            }
            Strategy::FixedPoint(fixed_point) => {
                fixed_point.validate(&batch.name)?;
                let max_iterations = fixed_point.max_iterations;
                let mut current = plan.clone();
                loop {
                    if let Some(max) = max_iterations {
                        if report.iterations >= max {
                            warn!(
                                "Batch {:?} did not converge after {} iterations",
                                batch.name, max
                            );
                            return Err(QuartziteError::NonConvergence {
                                batch: batch.name.clone(),
                                max_iterations: max,
                            });
                        }
                    }

                    let next = self.run_pass(batch, &current, &mut report)?;
                    if next.same(&current) {
                        break;
                    }
                    current = next;
                }
                current
            }
        };

        debug!(
            "Finished batch {:?} after {} iterations, effective rules: {:?}",
            batch.name, report.iterations, report.effective_rules
        );
        Ok((result, report))
    }

    /// Applies every rule of `batch` once, in order.
    fn run_pass(
        &self,
        batch: &Batch,
        plan: &PlanRef,
        report: &mut BatchReport,
    ) -> QuartziteResult<PlanRef> {
        report.iterations += 1;
        let mut current = plan.clone();

        for rule in &batch.rules {
            if let Some(rule_id) = rule.rule_id() {
                if self.config.excluded_rules.contains(rule_id) {
                    trace!("Skipping excluded rule {}", rule.name());
                    continue;
                }
            }

            let next = rule.apply(&current)?;
            if !next.same(&current) {
                if log_enabled!(Level::Trace) {
                    trace!(
                        "Rule {} changed plan\n{}\ninto\n{}",
                        rule.name(),
                        current.tree_string(),
                        next.tree_string()
                    );
                }
                report.effective_rules.push(rule.name().to_string());
                current = next;
            }
        }

        Ok(current)
    }
}

fn check_integrity(batch: &Batch, plan: &PlanRef) -> QuartziteResult<()> {
    let broken = plan.collect_down(|node| {
        let missing = node.missing_input();
        (!missing.is_empty()).then(|| format!("{} misses {}", node.caption(), missing))
    });

    match broken.into_iter().next() {
        Some(detail) => Err(QuartziteError::PlanIntegrity {
            batch: batch.name.clone(),
            detail,
        }),
        None => Ok(()),
    }
}
