//! Outcome kinds for a recorded test case

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The outcome of a single test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Outcome {
    /// The test ran and passed
    Pass,
    /// The test ran and failed; carries a failure message
    Fail,
    /// The test was deliberately not run; carries a reason
    Skip,
}

impl Outcome {
    /// Every outcome kind, in reporting order
    pub const ALL: [Outcome; 3] = [Outcome::Pass, Outcome::Fail, Outcome::Skip];

    /// Whether a case with this outcome must carry a detail string
    pub fn requires_detail(self) -> bool {
        matches!(self, Outcome::Fail | Outcome::Skip)
    }

    /// Lowercase name used in serialized records
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Pass => "pass",
            Outcome::Fail => "fail",
            Outcome::Skip => "skip",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown outcome name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown outcome '{0}' (expected pass, fail or skip)")]
pub struct ParseOutcomeError(pub String);

impl FromStr for Outcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass" => Ok(Outcome::Pass),
            "fail" => Ok(Outcome::Fail),
            "skip" => Ok(Outcome::Skip),
            _ => Err(ParseOutcomeError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Outcome {
    type Error = ParseOutcomeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
