//! Test runner - execute discovered test scripts

use crate::testing::discovery::{TestScript, TestSuite};
use crate::testing::gates::GateSet;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tally_core::{merge_workers, Outcome, ReportResult, Reporter};

/// Result of running a single test script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptResult {
    /// Exited with status 0
    Pass,
    /// Anything else; carries the failure message
    Fail { message: String },
    /// Gated off, or exited with the skip status; carries the reason
    Skip { reason: String },
}

impl ScriptResult {
    pub fn outcome(&self) -> Outcome {
        match self {
            ScriptResult::Pass => Outcome::Pass,
            ScriptResult::Fail { .. } => Outcome::Fail,
            ScriptResult::Skip { .. } => Outcome::Skip,
        }
    }

    /// Failure message or skip reason
    pub fn detail(&self) -> Option<&str> {
        match self {
            ScriptResult::Pass => None,
            ScriptResult::Fail { message } => Some(message.as_str()),
            ScriptResult::Skip { reason } => Some(reason.as_str()),
        }
    }

    /// Record this result for `name`
    pub fn record_into(&self, reporter: &mut Reporter, name: &str) -> ReportResult<()> {
        reporter.record(name, self.outcome(), self.detail())?;
        Ok(())
    }
}

/// Test runner with configuration
pub struct TestRunner {
    /// Number of workers; 1 runs everything on the calling thread
    workers: usize,
    /// Program (plus arguments) used to launch each script
    interpreter: Option<Vec<String>>,
    /// Exit status meaning "skipped"
    skip_exit_code: i32,
    /// Skip gates checked before launching
    gates: GateSet,
    /// Working directory for scripts
    working_dir: Option<PathBuf>,
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunner {
    /// Create a new test runner with default settings
    pub fn new() -> Self {
        Self {
            workers: rayon::current_num_threads(),
            interpreter: None,
            skip_exit_code: 77,
            gates: GateSet::default(),
            working_dir: None,
        }
    }

    /// Set the number of parallel workers (at least 1)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Launch scripts through `interpreter` (whitespace-separated program and arguments)
    pub fn with_interpreter(mut self, interpreter: Option<&str>) -> Self {
        self.interpreter = interpreter
            .map(|i| i.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|parts| !parts.is_empty());
        self
    }

    pub fn with_skip_exit_code(mut self, code: i32) -> Self {
        self.skip_exit_code = code;
        self
    }

    pub fn with_gates(mut self, gates: GateSet) -> Self {
        self.gates = gates;
        self
    }

    /// Run scripts with `dir` as their working directory
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Run all tests in the suite, recording into a single reporter
    ///
    /// With more than one worker, tests are dealt round-robin; each worker
    /// records into its own reporter and the reporters are merged back into
    /// suite order.
    pub fn run(&self, suite: &TestSuite) -> Result<Reporter> {
        let workers = self.workers.min(suite.len()).max(1);
        tracing::info!(
            tests = suite.len(),
            workers,
            gated = !self.gates.is_empty(),
            "running tests"
        );

        if workers == 1 {
            return self.run_worker(suite, 0, 1).map_err(Into::into);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .context("failed to start test workers")?;

        let reporters = pool.install(|| {
            (0..workers)
                .into_par_iter()
                .map(|worker| self.run_worker(suite, worker, workers))
                .collect::<ReportResult<Vec<_>>>()
        })?;

        Ok(merge_workers(reporters)?)
    }

    /// Run every `stride`-th test starting at `offset`
    fn run_worker(&self, suite: &TestSuite, offset: usize, stride: usize) -> ReportResult<Reporter> {
        let mut reporter = Reporter::new();
        for script in suite.tests.iter().skip(offset).step_by(stride) {
            let result = self.run_script(script);
            result.record_into(&mut reporter, &script.name)?;
        }
        Ok(reporter)
    }

    /// Run a single test script
    pub fn run_script(&self, script: &TestScript) -> ScriptResult {
        if let Some(reason) = self.gates.skip_reason(&script.name) {
            tracing::debug!(test = %script.name, %reason, "gated off");
            return ScriptResult::Skip { reason };
        }

        let mut command = match &self.interpreter {
            Some(parts) => {
                let mut command = Command::new(&parts[0]);
                command.args(&parts[1..]).arg(&script.path);
                command
            }
            None => Command::new(&script.path),
        };
        command.stdin(Stdio::null());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        match command.output() {
            Ok(output) => self.classify(&output),
            Err(e) => ScriptResult::Fail {
                message: format!("failed to launch: {}", e),
            },
        }
    }

    /// Map a finished script's exit status and output to a result
    fn classify(&self, output: &Output) -> ScriptResult {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        match output.status.code() {
            Some(0) => ScriptResult::Pass,
            Some(code) if code == self.skip_exit_code => ScriptResult::Skip {
                reason: last_line(&stdout).unwrap_or("skipped by test").to_string(),
            },
            Some(code) => ScriptResult::Fail {
                message: last_line(&stderr)
                    .or_else(|| last_line(&stdout))
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("exited with status {}", code)),
            },
            None => ScriptResult::Fail {
                message: "terminated by signal".to_string(),
            },
        }
    }
}

/// Last non-blank line of `text`, trimmed
fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).rfind(|line| !line.is_empty())
}
