pub mod run;
pub mod summarize;

use crate::testing::reporter::json_summary;
use crate::testing::HumanReport;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tally_config::{Config, ConfigLoader, OutputFormat};
use tally_core::Reporter;

/// Load tally.toml from `config_file`, or search upward from `start_dir`
pub fn load_config(config_file: Option<&Path>, start_dir: &Path) -> Result<Config> {
    let mut loader = ConfigLoader::new();
    match config_file {
        Some(path) => loader
            .load_from_file(path)
            .with_context(|| format!("failed to load {}", path.display())),
        None => loader
            .load_from_directory(start_dir)
            .context("failed to load configuration"),
    }
}

/// Output flags shared by the commands
#[derive(Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output in JSON format
    pub json: bool,
    /// Verbose output (show all test names)
    pub verbose: bool,
    /// Disable colored output
    pub no_color: bool,
}

/// Effective output settings: CLI flags over configuration
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub verbose: bool,
    pub color: bool,
}

impl OutputOptions {
    pub fn resolve(args: &OutputArgs, config: &Config) -> Self {
        Self {
            format: if args.json {
                OutputFormat::Json
            } else {
                config.format()
            },
            verbose: args.verbose || config.verbose(),
            color: !args.no_color && config.color(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

/// Finalize `reporter` and print its report; returns whether the run was clean
pub fn finish_run(
    mut reporter: Reporter,
    options: &OutputOptions,
    elapsed: Option<Duration>,
) -> Result<bool> {
    let summary = reporter.summarize();

    match options.format {
        OutputFormat::Json => println!("{}", json_summary(&summary)),
        OutputFormat::Human => HumanReport::new(options.verbose)
            .with_no_color(!options.color)
            .print(reporter.cases(), &summary, elapsed)
            .context("failed to write report")?,
    }

    Ok(summary.is_clean())
}
