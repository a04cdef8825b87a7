use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod logging;
mod testing;

/// Run test scripts and report which passed, failed, or were skipped.
///
/// Every skip carries a reason, so a green run never hides work that did not
/// happen. Skipped tests do not fail the run; any failure does.
///
/// EXAMPLES:
///     tally run                       Run all tests under ./tests
///     tally run parser -v             Run tests matching 'parser', one line each
///     tally run --sequential          Run on a single worker
///     tally summarize w0.jsonl w1.jsonl   Merge records from external runners
///
/// EXIT STATUS:
///     0  every test passed or was skipped
///     1  at least one test failed
///     2  tally could not complete the run
///
/// ENVIRONMENT VARIABLES:
///     TALLY_JSON        Set to '1' for JSON output by default
///     TALLY_FORMAT      Output format from configuration ('human' or 'json')
///     TALLY_WORKERS     Default number of parallel workers
///     TALLY_SEQUENTIAL  Set to '1' to always run on a single worker
///     TALLY_VERBOSE     Set to '1' for one line per test
///     NO_COLOR          Set to disable colored output
///     RUST_LOG          Diagnostic logging filter (written to stderr)
#[derive(Parser)]
#[command(name = "tally")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Output flags shared by run and summarize
#[derive(Args, Debug, Clone)]
struct OutputFlags {
    /// Verbose output (show all test names)
    #[arg(long, short = 'v')]
    verbose: bool,
    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,
    /// Output in JSON format
    #[arg(long, env = "TALLY_JSON")]
    json: bool,
}

impl From<OutputFlags> for commands::OutputArgs {
    fn from(flags: OutputFlags) -> Self {
        Self {
            json: flags.json,
            verbose: flags.verbose,
            no_color: flags.no_color,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Discover and run test scripts
    ///
    /// Finds files named '<prefix>-*' or '<prefix>_*' in the test directory,
    /// applies the configured skip gates and runs the rest in parallel.
    /// A script that exits 0 passes. A script that exits with the skip status
    /// (77 by default) is skipped, with its last line of stdout as the reason.
    /// Anything else fails.
    ///
    /// EXAMPLES:
    ///     tally run                       Run all tests
    ///     tally run parser                Run tests whose name contains 'parser'
    ///     tally run -j 4                  Use four workers
    ///     tally run --dir it --json       Run ./it, report as JSON
    #[command(visible_alias = "r")]
    Run {
        /// Filter tests by name pattern
        pattern: Option<String>,
        /// Run tests sequentially instead of parallel
        #[arg(long)]
        sequential: bool,
        /// Number of parallel workers
        #[arg(long, short = 'j')]
        workers: Option<usize>,
        /// Test directory (defaults to [run] dir, then ./tests)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Program used to launch each script, e.g. 'sh' or 'python3 -u'
        #[arg(long)]
        interpreter: Option<String>,
        /// Path to tally.toml (defaults to searching upward)
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        output: OutputFlags,
    },

    /// Summarize outcome records written by another runner
    ///
    /// Each file holds one worker's records as JSON Lines:
    ///     {"name": "test_a", "outcome": "pass"}
    ///     {"name": "test_b", "outcome": "skip", "detail": "API not available"}
    /// Files are merged in order of recording, then reported like a run.
    ///
    /// EXAMPLES:
    ///     tally summarize run.jsonl
    ///     tally summarize w0.jsonl w1.jsonl --json
    #[command(visible_alias = "s")]
    Summarize {
        /// Record files, one per worker
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Path to tally.toml (defaults to searching upward)
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        output: OutputFlags,
    },

    /// Generate shell completions
    ///
    /// Outputs shell completion scripts for bash, zsh, fish, or powershell.
    /// Redirect to a file and source it in your shell configuration.
    ///
    /// EXAMPLES:
    ///     tally completions bash > ~/.bash_completions/tally.bash
    ///     tally completions zsh > ~/.zfunc/_tally
    ///     tally completions fish > ~/.config/fish/completions/tally.fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> ExitCode {
    logging::init_tracing();
    let cli = Cli::parse();

    match execute(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Dispatch a command; `Ok(false)` means the run had failures
fn execute(command: Commands) -> Result<bool> {
    match command {
        Commands::Run {
            pattern,
            sequential,
            workers,
            dir,
            interpreter,
            config,
            output,
        } => {
            let args = commands::run::RunArgs {
                pattern,
                sequential,
                workers,
                dir,
                interpreter,
                config,
                start_dir: std::env::current_dir()?,
                output: output.into(),
            };
            commands::run::run(args)
        }
        Commands::Summarize {
            files,
            config,
            output,
        } => {
            let args = commands::summarize::SummarizeArgs {
                files,
                config,
                start_dir: std::env::current_dir()?,
                output: output.into(),
            };
            commands::summarize::run(args)
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_run_defaults() {
        let cli = Cli::parse_from(["tally", "run"]);
        match cli.command {
            Commands::Run {
                pattern,
                sequential,
                workers,
                dir,
                ..
            } => {
                assert_eq!(pattern, None);
                assert!(!sequential);
                assert_eq!(workers, None);
                assert_eq!(dir, None);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_run_flags() {
        let cli = Cli::parse_from([
            "tally",
            "run",
            "parser",
            "-j",
            "4",
            "--interpreter",
            "python3 -u",
            "-v",
            "--json",
        ]);
        match cli.command {
            Commands::Run {
                pattern,
                workers,
                interpreter,
                output,
                ..
            } => {
                assert_eq!(pattern.as_deref(), Some("parser"));
                assert_eq!(workers, Some(4));
                assert_eq!(interpreter.as_deref(), Some("python3 -u"));
                assert!(output.verbose);
                assert!(output.json);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_alias_r_for_run() {
        let cli = Cli::parse_from(["tally", "r", "--sequential"]);
        match cli.command {
            Commands::Run { sequential, .. } => assert!(sequential),
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_summarize_files() {
        let cli = Cli::parse_from(["tally", "s", "w0.jsonl", "w1.jsonl"]);
        match cli.command {
            Commands::Summarize { files, .. } => {
                assert_eq!(files, vec![PathBuf::from("w0.jsonl"), PathBuf::from("w1.jsonl")])
            }
            _ => panic!("Expected Summarize command"),
        }
    }

    #[test]
    fn test_summarize_requires_files() {
        assert!(Cli::try_parse_from(["tally", "summarize"]).is_err());
    }

    #[test]
    fn test_completions_bash() {
        let cli = Cli::parse_from(["tally", "completions", "bash"]);
        match cli.command {
            Commands::Completions { shell } => assert_eq!(shell, Shell::Bash),
            _ => panic!("Expected Completions command"),
        }
    }
}
