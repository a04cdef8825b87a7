//! Combine per-worker reporters into a single run
//!
//! Reporters are single-threaded. Parallel workers each record into their
//! own reporter; once every worker is done the caller merges them here.

use crate::error::ReportResult;
use crate::reporter::Reporter;

/// Merge worker reporters into one fresh reporter
///
/// Cases are ordered by their per-worker sequence number, ties broken by
/// worker position, and re-recorded so the merged run numbers them 1..n.
/// Workers dealt tests round-robin therefore merge back into dealing order.
/// A name recorded by two workers is rejected as a duplicate.
pub fn merge_workers(workers: impl IntoIterator<Item = Reporter>) -> ReportResult<Reporter> {
    let mut tagged: Vec<_> = workers
        .into_iter()
        .enumerate()
        .flat_map(|(worker, reporter)| {
            reporter
                .into_cases()
                .into_iter()
                .map(move |case| (case.sequence(), worker, case))
        })
        .collect();

    tagged.sort_by_key(|(sequence, worker, _)| (*sequence, *worker));

    let mut merged = Reporter::new();
    for (_, _, case) in &tagged {
        merged.record(case.name(), case.outcome(), case.detail())?;
    }

    tracing::info!(cases = merged.len(), "merged worker runs");
    Ok(merged)
}
