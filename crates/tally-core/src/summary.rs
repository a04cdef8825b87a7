//! Run summaries

use crate::outcome::Outcome;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Number of recorded cases per outcome kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub pass: usize,
    pub fail: usize,
    pub skip: usize,
}

impl OutcomeCounts {
    /// Count for one outcome kind
    pub fn get(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Pass => self.pass,
            Outcome::Fail => self.fail,
            Outcome::Skip => self.skip,
        }
    }

    /// Sum over all outcome kinds
    pub fn total(&self) -> usize {
        self.pass + self.fail + self.skip
    }

    pub(crate) fn increment(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Pass => self.pass += 1,
            Outcome::Fail => self.fail += 1,
            Outcome::Skip => self.skip += 1,
        }
    }
}

impl Index<Outcome> for OutcomeCounts {
    type Output = usize;

    fn index(&self, outcome: Outcome) -> &usize {
        match outcome {
            Outcome::Pass => &self.pass,
            Outcome::Fail => &self.fail,
            Outcome::Skip => &self.skip,
        }
    }
}

/// A `(name, reason)` pair for a skipped or failed case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseNote {
    pub name: String,
    pub reason: String,
}

impl CaseNote {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Final report of a run
///
/// `skipped` and `failed` are in recording order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub counts: OutcomeCounts,
    pub skipped: Vec<CaseNote>,
    pub failed: Vec<CaseNote>,
}

impl RunSummary {
    /// Number of cases recorded in the run
    pub fn total(&self) -> usize {
        self.counts.total()
    }

    /// A run is clean when nothing failed
    pub fn is_clean(&self) -> bool {
        self.counts.fail == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_index_matches_get() {
        let counts = OutcomeCounts {
            pass: 3,
            fail: 1,
            skip: 2,
        };
        for outcome in Outcome::ALL {
            assert_eq!(counts[outcome], counts.get(outcome));
        }
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn test_empty_summary_is_clean() {
        let summary = RunSummary::default();
        assert_eq!(summary.total(), 0);
        assert!(summary.is_clean());
    }

    #[test]
    fn test_summary_json_shape() {
        let summary = RunSummary {
            counts: OutcomeCounts {
                pass: 1,
                fail: 0,
                skip: 1,
            },
            skipped: vec![CaseNote::new("test_b", "offline")],
            failed: vec![],
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "counts": { "pass": 1, "fail": 0, "skip": 1 },
                "skipped": [{ "name": "test_b", "reason": "offline" }],
                "failed": []
            })
        );
    }
}
