//! Run command - discover, gate and execute test scripts

use crate::commands::{finish_run, load_config, OutputArgs, OutputOptions};
use crate::testing::{GateSet, TestRunner, TestSuite};
use anyhow::{bail, Result};
use colored::*;
use std::path::PathBuf;
use std::time::Instant;
use tally_core::Reporter;

/// Arguments for the run command
pub struct RunArgs {
    /// Filter tests by name pattern
    pub pattern: Option<String>,
    /// Run tests on a single worker
    pub sequential: bool,
    /// Number of parallel workers
    pub workers: Option<usize>,
    /// Test directory (overrides `[run] dir`)
    pub dir: Option<PathBuf>,
    /// Program used to launch each script (overrides `[run] interpreter`)
    pub interpreter: Option<String>,
    /// Explicit tally.toml path
    pub config: Option<PathBuf>,
    /// Directory to search for tally.toml
    pub start_dir: PathBuf,
    pub output: OutputArgs,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            pattern: None,
            sequential: false,
            workers: None,
            dir: None,
            interpreter: None,
            config: None,
            start_dir: PathBuf::from("."),
            output: OutputArgs::default(),
        }
    }
}

/// Run the run command; returns whether the run was clean
pub fn run(args: RunArgs) -> Result<bool> {
    let config = load_config(args.config.as_deref(), &args.start_dir)?;
    let options = OutputOptions::resolve(&args.output, &config);
    let paint = |text: ColoredString| if options.color { text } else { text.clear() };

    let test_dir = args.dir.clone().unwrap_or_else(|| config.test_dir());
    if !test_dir.is_dir() {
        bail!("test directory not found: {}", test_dir.display());
    }

    if !options.is_json() {
        println!("{}", paint("Discovering tests...".bold()));
    }

    let mut suite = TestSuite::discover(&test_dir, &config.prefix());

    if !suite.walk_errors.is_empty() && !options.is_json() {
        eprintln!();
        eprintln!("{}", paint("Unreadable entries in test directory:".yellow().bold()));
        for (path, error) in &suite.walk_errors {
            eprintln!("  {} {}", paint("●".yellow()), path.display());
            eprintln!("    {}", paint(error.dimmed()));
        }
        eprintln!();
    }

    if let Some(pattern) = &args.pattern {
        suite = suite.filter(pattern);
    }

    if suite.is_empty() {
        if !options.is_json() {
            println!("{}", paint("No tests found.".yellow()));
        }
        return finish_run(Reporter::new(), &options, None);
    }

    if !options.is_json() {
        println!(
            "Found {} test{}",
            paint(suite.len().to_string().bold()),
            if suite.len() == 1 { "" } else { "s" }
        );
        println!();
    }

    let workers = if args.sequential || config.sequential() {
        1
    } else {
        args.workers
            .or(config.workers())
            .unwrap_or_else(rayon::current_num_threads)
    };
    let interpreter = args.interpreter.clone().or(config.interpreter());

    let runner = TestRunner::new()
        .with_workers(workers)
        .with_interpreter(interpreter.as_deref())
        .with_skip_exit_code(config.skip_exit_code())
        .with_gates(GateSet::new(config.gates().to_vec()))
        .with_working_dir(&test_dir);

    let start = Instant::now();
    let reporter = runner.run(&suite)?;
    finish_run(reporter, &options, Some(start.elapsed()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    /// Project with tally.toml (sh interpreter, tests/ dir) and the given scripts
    fn project(extra_config: &str, scripts: &[(&str, &str)]) -> TempDir {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("tally.toml"),
            format!("[run]\ninterpreter = \"sh\"\n\n{}", extra_config),
        )
        .unwrap();
        let tests = dir.path().join("tests");
        fs::create_dir(&tests).unwrap();
        for (name, body) in scripts {
            fs::write(tests.join(name), body).unwrap();
        }
        dir
    }

    fn args_for(dir: &Path) -> RunArgs {
        RunArgs {
            config: Some(dir.join("tally.toml")),
            output: OutputArgs {
                json: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    #[serial]
    fn test_command_clean_run() {
        let dir = project("", &[("test-a.sh", "exit 0\n"), ("test-b.sh", "exit 0\n")]);
        assert!(run(args_for(dir.path())).unwrap());
    }

    #[test]
    #[serial]
    fn test_command_failure_is_not_clean() {
        let dir = project(
            "",
            &[
                ("test-a.sh", "exit 0\n"),
                ("test-b.sh", "echo 'expected 1, got 2' >&2\nexit 1\n"),
            ],
        );
        assert!(!run(args_for(dir.path())).unwrap());
    }

    #[test]
    #[serial]
    fn test_command_skips_are_clean() {
        let dir = project(
            "[[gate]]\npattern = \"long\"\nrequire_env = \"TALLY_TEST_NEVER_SET\"\n",
            &[
                ("test-long.sh", "exit 1\n"),
                ("test-api.sh", "echo 'API not available'\nexit 77\n"),
            ],
        );
        assert!(run(args_for(dir.path())).unwrap());
    }

    #[test]
    #[serial]
    fn test_command_filter() {
        let dir = project(
            "",
            &[("test-add.sh", "exit 0\n"), ("test-sub.sh", "exit 1\n")],
        );
        let args = RunArgs {
            pattern: Some("add".to_string()),
            ..args_for(dir.path())
        };
        assert!(run(args).unwrap());
    }

    #[test]
    #[serial]
    fn test_command_no_tests_found() {
        let dir = project("", &[]);
        let args = RunArgs {
            output: OutputArgs {
                verbose: true,
                no_color: true,
                ..Default::default()
            },
            ..args_for(dir.path())
        };
        assert!(run(args).unwrap());
    }

    #[test]
    #[serial]
    fn test_command_missing_test_dir() {
        let dir = project("", &[]);
        let args = RunArgs {
            dir: Some(dir.path().join("missing")),
            ..args_for(dir.path())
        };
        let err = run(args).unwrap_err();
        assert!(err.to_string().contains("test directory not found"));
    }

    #[test]
    #[serial]
    fn test_command_invalid_config() {
        let dir = project("[[gate]]\npattern = \"x\"\n", &[]);
        assert!(run(args_for(dir.path())).is_err());
    }
}
