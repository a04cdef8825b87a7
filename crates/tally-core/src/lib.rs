//! Tally core: test-run outcome bookkeeping
//!
//! A [`Reporter`] collects the outcome of each named test case in a run
//! (pass, fail with a message, skip with a reason) and produces a
//! deterministic [`RunSummary`]. Deciding what passed, failed or was
//! skipped is the caller's job; the reporter only records and summarizes.
//!
//! # Example
//!
//! ```
//! use tally_core::{Outcome, Reporter};
//!
//! let mut reporter = Reporter::new();
//! reporter.pass("test_a").unwrap();
//! reporter.skip("test_b", "API not available").unwrap();
//! reporter.record("test_c", Outcome::Fail, Some("expected 1, got 2")).unwrap();
//!
//! let summary = reporter.summarize();
//! assert_eq!(summary.total(), 3);
//! assert!(!summary.is_clean());
//! ```

pub mod case;
pub mod error;
pub mod merge;
pub mod outcome;
pub mod reporter;
pub mod summary;

pub use case::TestCase;
pub use error::{InvalidCase, ReportError, ReportResult};
pub use merge::merge_workers;
pub use outcome::{Outcome, ParseOutcomeError};
pub use reporter::{Reporter, RunState};
pub use summary::{CaseNote, OutcomeCounts, RunSummary};
