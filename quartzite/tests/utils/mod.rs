use std::collections::HashMap;
use std::fmt::Debug;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use quartzite::executor::RulesExecutor;
use quartzite::plan::explain::explain_normalized;
use quartzite::plan::PlanRef;
use serde::Deserialize;
use serde::Serialize;

#[derive(Serialize, Deserialize)]
pub struct TestCase {
    /// Key of the input plan in [`TestCaseRunner::plans`].
    pub plan: String,
    /// Executor description, see [`RulesExecutor::from_yaml`].
    pub executor: String,
    pub expected_optimized_plan: String,
}

pub struct TestCaseRunner {
    /// Input file path.
    pub paths: Vec<PathBuf>,
    pub plans: HashMap<String, PlanRef>,
}

impl TestCaseRunner {
    pub fn run(self) {
        for path in &self.paths {
            let file = File::options()
                .read(true)
                .open(path)
                .with_context(|| format!("Failed to open test case file: {:?}", &path))
                .unwrap();

            let test_cases: Vec<TestCase> = serde_yaml::from_reader(file)
                .with_context(|| format!("Failed to load test cases from file: {:?}", &path))
                .unwrap();

            for test_case in test_cases {
                self.run_case(path, test_case);
            }
        }
    }

    fn run_case<P: AsRef<Path> + Debug>(&self, path: &P, test_case: TestCase) {
        let original_plan = self
            .plans
            .get(&test_case.plan)
            .with_context(|| format!("Unknown plan {} in {:?}", test_case.plan, path))
            .unwrap();

        let executor = RulesExecutor::from_yaml(&test_case.executor)
            .with_context(|| format!("Invalid executor for plan {} in {:?}", test_case.plan, path))
            .unwrap();

        let optimized_plan = executor.execute(original_plan).unwrap();
        let optimized_plan_string = explain_normalized(&optimized_plan).unwrap();

        assert_eq!(
            test_case.expected_optimized_plan, optimized_plan_string,
            "Optimized plan for {} in {:?} is different.",
            test_case.plan, path
        );
    }
}
