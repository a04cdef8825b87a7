//! Summarize command - merge record files written by external runners

use crate::commands::{finish_run, load_config, OutputArgs, OutputOptions};
use crate::testing::ingest::load_run;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tally_core::merge_workers;

/// Arguments for the summarize command
pub struct SummarizeArgs {
    /// JSON Lines record files, one per worker
    pub files: Vec<PathBuf>,
    /// Explicit tally.toml path
    pub config: Option<PathBuf>,
    /// Directory to search for tally.toml
    pub start_dir: PathBuf,
    pub output: OutputArgs,
}

/// Run the summarize command; returns whether the merged run was clean
pub fn run(args: SummarizeArgs) -> Result<bool> {
    let config = load_config(args.config.as_deref(), &args.start_dir)?;
    let options = OutputOptions::resolve(&args.output, &config);

    let workers = args
        .files
        .iter()
        .map(|path| load_run(path))
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(files = workers.len(), "merging record files");
    let reporter = merge_workers(workers).context("failed to merge record files")?;

    finish_run(reporter, &options, None)
}
