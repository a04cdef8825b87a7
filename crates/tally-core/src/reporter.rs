//! Reporter - collect test outcomes for one run

use crate::case::TestCase;
use crate::error::{InvalidCase, ReportError, ReportResult};
use crate::outcome::Outcome;
use crate::summary::{CaseNote, OutcomeCounts, RunSummary};
use std::collections::HashSet;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Accepting `record` calls
    Recording,
    /// `summarize` has been called; the run is read-only
    Finalized,
}

/// Accumulates test-case outcomes for a single run
///
/// A reporter is created at the start of a run, receives any number of
/// [`record`](Reporter::record) calls and is finalized by the first
/// [`summarize`](Reporter::summarize). It holds run-local state only and
/// is meant to be driven from one thread; parallel workers each use their
/// own reporter and combine them with [`merge_workers`](crate::merge_workers).
#[derive(Debug, Clone)]
pub struct Reporter {
    cases: Vec<TestCase>,
    names: HashSet<String>,
    counts: OutcomeCounts,
    next_sequence: u64,
    summary: Option<RunSummary>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    /// Create an empty reporter in the `Recording` state
    pub fn new() -> Self {
        Self {
            cases: Vec::new(),
            names: HashSet::new(),
            counts: OutcomeCounts::default(),
            next_sequence: 1,
            summary: None,
        }
    }

    /// Record the outcome of one test case
    ///
    /// `detail` is the failure message for `Fail` or the skip reason for
    /// `Skip` and must be non-empty for those; it must be absent (or empty)
    /// for `Pass`. Text is taken as given, so `" "` is not empty.
    /// A rejected call leaves the run unchanged.
    pub fn record(
        &mut self,
        name: impl Into<String>,
        outcome: Outcome,
        detail: Option<&str>,
    ) -> ReportResult<&TestCase> {
        let name = name.into();

        if self.is_finalized() {
            tracing::warn!(name = %name, "record after summarize rejected");
            return Err(ReportError::RunFinalized { name });
        }

        let detail = match self.validate(&name, outcome, detail) {
            Ok(detail) => detail,
            Err(invalid) => {
                tracing::warn!(name = %name, %outcome, error = %invalid, "invalid test case rejected");
                return Err(invalid.into());
            }
        };

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.counts.increment(outcome);
        self.names.insert(name.clone());

        tracing::debug!(name = %name, %outcome, sequence, "recorded test case");

        self.cases
            .push(TestCase::new(name, outcome, detail, sequence));
        Ok(&self.cases[self.cases.len() - 1])
    }

    /// Record a passing case
    pub fn pass(&mut self, name: impl Into<String>) -> ReportResult<&TestCase> {
        self.record(name, Outcome::Pass, None)
    }

    /// Record a failing case with its failure message
    pub fn fail(&mut self, name: impl Into<String>, message: &str) -> ReportResult<&TestCase> {
        self.record(name, Outcome::Fail, Some(message))
    }

    /// Record a skipped case with the reason it was skipped
    pub fn skip(&mut self, name: impl Into<String>, reason: &str) -> ReportResult<&TestCase> {
        self.record(name, Outcome::Skip, Some(reason))
    }

    /// Summarize the run and finalize it
    ///
    /// The first call moves the run to `Finalized`; later calls return the
    /// same summary.
    pub fn summarize(&mut self) -> RunSummary {
        if let Some(summary) = &self.summary {
            return summary.clone();
        }

        let summary = self.build_summary();
        tracing::info!(
            total = summary.total(),
            passed = summary.counts.pass,
            failed = summary.counts.fail,
            skipped = summary.counts.skip,
            "run finalized"
        );
        self.summary = Some(summary.clone());
        summary
    }

    /// True while no failing case has been recorded
    pub fn is_clean(&self) -> bool {
        self.counts.fail == 0
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        if self.summary.is_some() {
            RunState::Finalized
        } else {
            RunState::Recording
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.state() == RunState::Finalized
    }

    /// Recorded cases in recording order
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Consume the reporter, yielding its cases in recording order
    pub fn into_cases(self) -> Vec<TestCase> {
        self.cases
    }

    /// Check a `record` call, returning the detail to store
    fn validate(
        &self,
        name: &str,
        outcome: Outcome,
        detail: Option<&str>,
    ) -> Result<Option<String>, InvalidCase> {
        if name.is_empty() {
            return Err(InvalidCase::EmptyName);
        }

        let detail = detail.filter(|d| !d.is_empty());
        match (outcome.requires_detail(), detail) {
            (true, None) => {
                return Err(InvalidCase::MissingDetail {
                    name: name.to_string(),
                    outcome,
                })
            }
            (false, Some(_)) => {
                return Err(InvalidCase::UnexpectedDetail {
                    name: name.to_string(),
                })
            }
            _ => {}
        }

        if self.names.contains(name) {
            return Err(InvalidCase::DuplicateName {
                name: name.to_string(),
            });
        }

        Ok(detail.map(str::to_string))
    }

    fn build_summary(&self) -> RunSummary {
        let notes = |outcome: Outcome| -> Vec<CaseNote> {
            self.cases
                .iter()
                .filter(|case| case.outcome() == outcome)
                .map(|case| CaseNote::new(case.name(), case.detail().unwrap_or_default()))
                .collect()
        };

        RunSummary {
            counts: self.counts,
            skipped: notes(Outcome::Skip),
            failed: notes(Outcome::Fail),
        }
    }
}
