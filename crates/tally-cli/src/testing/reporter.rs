//! Test reporter - display run results

use colored::*;
use std::io::{self, Write};
use std::time::Duration;
use tally_core::{Outcome, RunSummary, TestCase};

/// Human-readable report with output configuration
pub struct HumanReport {
    /// Show one line per test instead of progress glyphs
    verbose: bool,
    /// Emit ANSI colors
    color: bool,
}

impl Default for HumanReport {
    fn default() -> Self {
        Self::new(false)
    }
}

impl HumanReport {
    /// Create a new report
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            color: true,
        }
    }

    /// Disable colored output
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.color = !no_color;
        self
    }

    /// Write the report to stdout
    pub fn print(
        &self,
        cases: &[TestCase],
        summary: &RunSummary,
        elapsed: Option<Duration>,
    ) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write(&mut out, cases, summary, elapsed)?;
        out.flush()
    }

    /// Write the full report: per-case lines, summary, skips, failures
    pub fn write<W: Write>(
        &self,
        out: &mut W,
        cases: &[TestCase],
        summary: &RunSummary,
        elapsed: Option<Duration>,
    ) -> io::Result<()> {
        for case in cases {
            self.write_case(out, case)?;
        }

        // Progress glyphs need a newline
        if !self.verbose && !cases.is_empty() {
            writeln!(out)?;
        }

        writeln!(out)?;
        self.write_summary(out, summary, elapsed)?;
        self.write_skipped(out, summary)?;
        self.write_failures(out, summary)
    }

    fn paint(&self, text: ColoredString) -> ColoredString {
        if self.color {
            text
        } else {
            text.clear()
        }
    }

    fn write_case<W: Write>(&self, out: &mut W, case: &TestCase) -> io::Result<()> {
        let (label, glyph) = match case.outcome() {
            Outcome::Pass => ("PASS".green().bold(), ".".green()),
            Outcome::Fail => ("FAIL".red().bold(), "F".red().bold()),
            Outcome::Skip => ("SKIP".yellow().bold(), "S".yellow()),
        };

        if !self.verbose {
            return write!(out, "{}", self.paint(glyph));
        }

        match (case.outcome(), case.detail()) {
            (Outcome::Skip, Some(reason)) => writeln!(
                out,
                "{} {} {}",
                self.paint(label),
                case.name(),
                self.paint(format!("({})", reason).dimmed())
            ),
            _ => writeln!(out, "{} {}", self.paint(label), case.name()),
        }
    }

    fn write_summary<W: Write>(
        &self,
        out: &mut W,
        summary: &RunSummary,
        elapsed: Option<Duration>,
    ) -> io::Result<()> {
        let counts = summary.counts;

        writeln!(out, "{}", "─".repeat(50))?;

        let status = if summary.is_clean() {
            "PASSED".green().bold()
        } else {
            "FAILED".red().bold()
        };

        let failed = if counts.fail > 0 {
            counts.fail.to_string().red().bold()
        } else {
            counts.fail.to_string().normal()
        };
        let skipped = if counts.skip > 0 {
            counts.skip.to_string().yellow().bold()
        } else {
            counts.skip.to_string().normal()
        };

        writeln!(
            out,
            "Test result: {} | {} total, {} passed, {} failed, {} skipped",
            self.paint(status),
            self.paint(summary.total().to_string().bold()),
            self.paint(counts.pass.to_string().green().bold()),
            self.paint(failed),
            self.paint(skipped),
        )?;

        if let Some(elapsed) = elapsed {
            writeln!(out, "Time: {:.2?}", elapsed)?;
        }
        Ok(())
    }

    fn write_skipped<W: Write>(&self, out: &mut W, summary: &RunSummary) -> io::Result<()> {
        if summary.skipped.is_empty() {
            return Ok(());
        }

        writeln!(out)?;
        writeln!(out, "{}", self.paint("Skipped:".yellow().bold()))?;
        for note in &summary.skipped {
            writeln!(
                out,
                "  {} {}: {}",
                self.paint("○".yellow()),
                note.name,
                note.reason
            )?;
        }
        Ok(())
    }

    fn write_failures<W: Write>(&self, out: &mut W, summary: &RunSummary) -> io::Result<()> {
        if summary.failed.is_empty() {
            return Ok(());
        }

        writeln!(out)?;
        writeln!(out, "{}", self.paint("Failures:".red().bold()))?;
        writeln!(out)?;

        for note in &summary.failed {
            writeln!(out, "  {} {}", self.paint("●".red()), self.paint(note.name.bold()))?;
            for line in note.reason.lines() {
                writeln!(out, "      {}", self.paint(line.dimmed()))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

/// JSON document for a run summary
pub fn json_summary(summary: &RunSummary) -> serde_json::Value {
    serde_json::json!({
        "clean": summary.is_clean(),
        "total": summary.total(),
        "counts": summary.counts,
        "skipped": summary.skipped,
        "failed": summary.failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tally_core::Reporter;

    fn sample() -> (Vec<TestCase>, RunSummary) {
        let mut reporter = Reporter::new();
        reporter.pass("test_a").unwrap();
        reporter.skip("test_b", "API not available").unwrap();
        reporter.fail("test_c", "expected 1, got 2").unwrap();
        let summary = reporter.summarize();
        (reporter.into_cases(), summary)
    }

    fn render(report: &HumanReport, cases: &[TestCase], summary: &RunSummary) -> String {
        let mut out = Vec::new();
        report.write(&mut out, cases, summary, None).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_report_verbose_lines() {
        let (cases, summary) = sample();
        let text = render(&HumanReport::new(true).with_no_color(true), &cases, &summary);

        assert!(text.contains("PASS test_a\n"));
        assert!(text.contains("SKIP test_b (API not available)\n"));
        assert!(text.contains("FAIL test_c\n"));
        assert!(text.contains("Test result: FAILED | 3 total, 1 passed, 1 failed, 1 skipped"));
    }

    #[test]
    fn test_report_quiet_glyphs() {
        let (cases, summary) = sample();
        let text = render(&HumanReport::new(false).with_no_color(true), &cases, &summary);
        assert!(text.starts_with(".SF\n"));
    }

    #[test]
    fn test_report_sections_in_recording_order() {
        let mut reporter = Reporter::new();
        reporter.skip("second_skip_name", "b").unwrap();
        reporter.fail("f1", "boom\nat line 3").unwrap();
        reporter.skip("first_skip_name", "a").unwrap();
        let summary = reporter.summarize();

        let text = render(
            &HumanReport::new(true).with_no_color(true),
            reporter.cases(),
            &summary,
        );

        let skipped = text.find("Skipped:").unwrap();
        let failures = text.find("Failures:").unwrap();
        assert!(skipped < failures);
        assert!(text.contains("  ○ second_skip_name: b\n  ○ first_skip_name: a\n"));
        assert!(text.contains("      boom\n      at line 3\n"));
    }

    #[test]
    fn test_report_clean_run_has_no_sections() {
        let mut reporter = Reporter::new();
        reporter.pass("ok").unwrap();
        let summary = reporter.summarize();

        let text = render(
            &HumanReport::new(false).with_no_color(true),
            reporter.cases(),
            &summary,
        );
        assert!(text.contains("Test result: PASSED | 1 total, 1 passed, 0 failed, 0 skipped"));
        assert!(!text.contains("Skipped:"));
        assert!(!text.contains("Failures:"));
    }

    #[test]
    fn test_report_empty() {
        let summary = RunSummary::default();
        let text = render(&HumanReport::new(true).with_no_color(true), &[], &summary);
        assert!(text.contains("0 total"));
    }

    #[test]
    fn test_json_summary_shape() {
        let (_, summary) = sample();
        assert_eq!(
            json_summary(&summary),
            serde_json::json!({
                "clean": false,
                "total": 3,
                "counts": { "pass": 1, "fail": 1, "skip": 1 },
                "skipped": [{ "name": "test_b", "reason": "API not available" }],
                "failed": [{ "name": "test_c", "reason": "expected 1, got 2" }],
            })
        );
    }
}
