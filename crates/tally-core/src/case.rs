//! A single recorded test case

use crate::outcome::Outcome;
use serde::Serialize;

/// One test case as stored by a [`Reporter`](crate::Reporter)
///
/// Cases are only constructed by the reporter, so the fields are private:
/// a `TestCase` always has a non-empty name, a detail exactly when its
/// outcome requires one, and a sequence number unique within its run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    name: String,
    outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    sequence: u64,
}

impl TestCase {
    pub(crate) fn new(name: String, outcome: Outcome, detail: Option<String>, sequence: u64) -> Self {
        Self {
            name,
            outcome,
            detail,
            sequence,
        }
    }

    /// Name of the test case
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Recorded outcome
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Failure message or skip reason; `None` for passing cases
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Position in recording order (starts at 1)
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_serializes_without_absent_detail() {
        let pass = TestCase::new("a".to_string(), Outcome::Pass, None, 1);
        let skip = TestCase::new("b".to_string(), Outcome::Skip, Some("offline".to_string()), 2);

        assert_eq!(
            serde_json::to_value(&pass).unwrap(),
            serde_json::json!({ "name": "a", "outcome": "pass", "sequence": 1 })
        );
        assert_eq!(
            serde_json::to_value(&skip).unwrap(),
            serde_json::json!({ "name": "b", "outcome": "skip", "detail": "offline", "sequence": 2 })
        );
    }
}
