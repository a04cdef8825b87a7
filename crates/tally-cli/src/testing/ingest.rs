//! Record ingestion - load outcomes written by an external test runner
//!
//! The input is JSON Lines, one record per line:
//!
//! ```text
//! {"name": "test_a", "outcome": "pass"}
//! {"name": "test_b", "outcome": "skip", "detail": "API not available"}
//! ```
//!
//! Each file is one worker's run.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tally_core::{Outcome, Reporter};

/// One line of a record file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Record {
    name: String,
    outcome: Outcome,
    #[serde(default)]
    detail: Option<String>,
}

/// Load a record file into a fresh reporter
pub fn load_run(path: &Path) -> Result<Reporter> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_run(&source, &path.display().to_string())
}

/// Parse JSON Lines records; `origin` names the source in errors
pub fn parse_run(source: &str, origin: &str) -> Result<Reporter> {
    let mut reporter = Reporter::new();

    for (index, line) in source.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let record: Record = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: malformed record", origin, line_no))?;

        reporter
            .record(record.name, record.outcome, record.detail.as_deref())
            .with_context(|| format!("{}:{}: rejected record", origin, line_no))?;
    }

    tracing::debug!(origin, cases = reporter.len(), "loaded record file");
    Ok(reporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tally_core::ReportError;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_run_in_order() {
        let source = r#"
{"name": "test_a", "outcome": "pass"}
{"name": "test_b", "outcome": "skip", "detail": "API not available"}

{"name": "test_c", "outcome": "fail", "detail": "expected 1, got 2"}
"#;

        let reporter = parse_run(source, "run.jsonl").unwrap();
        let cases = reporter.cases();
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[1].name(), "test_b");
        assert_eq!(cases[1].outcome(), Outcome::Skip);
        assert_eq!(cases[1].detail(), Some("API not available"));
        assert_eq!(cases[2].sequence(), 3);
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let source = "{\"name\": \"a\", \"outcome\": \"pass\"}\nnot json\n";
        let err = parse_run(source, "run.jsonl").unwrap_err();
        assert!(err.to_string().contains("run.jsonl:2: malformed record"));
    }

    #[test]
    fn test_unknown_outcome_is_malformed() {
        let source = r#"{"name": "a", "outcome": "error"}"#;
        assert!(parse_run(source, "x").is_err());
    }

    #[test]
    fn test_outcome_names_are_case_insensitive() {
        let source = r#"
{"name": "a", "outcome": "PASS"}
{"name": "b", "outcome": "Skip", "detail": "offline"}
"#;

        let reporter = parse_run(source, "run.jsonl").unwrap();
        let outcomes: Vec<Outcome> = reporter.cases().iter().map(|c| c.outcome()).collect();
        assert_eq!(outcomes, vec![Outcome::Pass, Outcome::Skip]);
    }

    #[test]
    fn test_invalid_case_keeps_report_error() {
        let source = r#"{"name": "", "outcome": "pass"}"#;
        let err = parse_run(source, "run.jsonl").unwrap_err();
        assert!(err.to_string().contains("run.jsonl:1: rejected record"));

        let cause = err.downcast_ref::<ReportError>().unwrap();
        assert!(cause.is_invalid_case());
    }

    #[test]
    fn test_load_run_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"name": "t1", "outcome": "pass"}}"#).unwrap();

        let reporter = load_run(file.path()).unwrap();
        assert_eq!(reporter.len(), 1);
    }

    #[test]
    fn test_load_run_missing_file() {
        let err = load_run(Path::new("/nonexistent/run.jsonl")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
