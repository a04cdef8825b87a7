//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::gate::GateConfig;
use crate::global::{GlobalConfig, OutputConfig, OutputFormat};
use crate::project::{
    ProjectConfig, RunConfig, DEFAULT_PREFIX, DEFAULT_SKIP_EXIT_CODE, DEFAULT_TEST_DIR,
};
use crate::{is_truthy, ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Project configuration file name
pub const CONFIG_FILE_NAME: &str = "tally.toml";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.tally/config.toml) - lowest priority
/// 2. Project config (./tally.toml) - overrides global
/// 3. Environment variables (TALLY_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Global configuration
    pub global: GlobalConfig,

    /// Project root directory (where tally.toml was found)
    pub project_root: Option<PathBuf>,

    /// Directory the search started from
    pub start_dir: PathBuf,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Read the global config from `path` instead of ~/.tally/config.toml
    pub fn with_global_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find tally.toml, then loads and merges
    /// global config if it exists.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = self.find_project_config(start_dir)?;
        let global_config = self.load_global_config()?;
        let project_config = self.apply_env_overrides(project_config)?;

        tracing::debug!(
            project_root = ?project_root,
            gates = project_config.gates.len(),
            "configuration loaded"
        );

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
            start_dir: start_dir.to_path_buf(),
        })
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = ProjectConfig::load_from_file(config_path)?;
        let global_config = self.load_global_config()?;
        let project_config = self.apply_env_overrides(project_config)?;

        let project_root = config_path.parent().map(|p| p.to_path_buf());
        let start_dir = project_root.clone().unwrap_or_else(|| PathBuf::from("."));

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
            start_dir,
        })
    }

    /// Find project configuration by walking up directory tree
    ///
    /// Returns (project_root, project_config); no tally.toml anywhere up the
    /// tree yields the default config and no root
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.exists() {
                let project_config = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project_config));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    /// Load global configuration from ~/.tally/config.toml
    ///
    /// A missing file or home directory means defaults; a file that exists
    /// but does not parse is an error.
    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        if self.global_config_path.is_none() {
            match GlobalConfig::global_config_path() {
                Ok(path) => self.global_config_path = Some(path),
                Err(ConfigError::HomeNotFound) => return Ok(GlobalConfig::default()),
                Err(e) => return Err(e),
            }
        }

        match &self.global_config_path {
            Some(path) if path.exists() => GlobalConfig::load_from_file(path),
            _ => Ok(GlobalConfig::default()),
        }
    }

    /// Apply environment variable overrides to project config
    ///
    /// TALLY_FORMAT=human|json, TALLY_VERBOSE=1, TALLY_WORKERS=<n>,
    /// TALLY_SEQUENTIAL=1
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if let Ok(format) = env::var("TALLY_FORMAT") {
            let format: OutputFormat = format.parse()?;
            config
                .output
                .get_or_insert_with(OutputConfig::default)
                .format = Some(format);
        }

        if let Ok(verbose) = env::var("TALLY_VERBOSE") {
            config
                .output
                .get_or_insert_with(OutputConfig::default)
                .verbose = Some(is_truthy(&verbose));
        }

        if let Ok(workers) = env::var("TALLY_WORKERS") {
            let workers = workers
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    field: "TALLY_WORKERS".to_string(),
                    reason: format!("expected a positive integer, got '{}'", workers),
                })?;
            config.run.get_or_insert_with(RunConfig::default).workers = Some(workers);
        }

        if let Ok(sequential) = env::var("TALLY_SEQUENTIAL") {
            config.run.get_or_insert_with(RunConfig::default).sequential =
                Some(is_truthy(&sequential));
        }

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if this is a project (has tally.toml)
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }

    fn run(&self) -> RunConfig {
        self.project.run_config()
    }

    /// Directory searched for test scripts
    ///
    /// Relative `[run] dir` values resolve against the project root, or the
    /// start directory outside a project.
    pub fn test_dir(&self) -> PathBuf {
        let base = self.project_root().unwrap_or(self.start_dir.as_path());
        let dir = self
            .run()
            .dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEST_DIR));
        base.join(dir)
    }

    /// Test script file-name prefix
    pub fn prefix(&self) -> String {
        self.run()
            .prefix
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string())
    }

    /// Program used to launch each script, if any
    pub fn interpreter(&self) -> Option<String> {
        self.run().interpreter
    }

    /// Configured worker count (None means one per CPU)
    pub fn workers(&self) -> Option<usize> {
        self.run().workers
    }

    pub fn sequential(&self) -> bool {
        self.run().sequential.unwrap_or(false)
    }

    /// Exit status meaning "skipped"
    pub fn skip_exit_code(&self) -> i32 {
        self.run().skip_exit_code.unwrap_or(DEFAULT_SKIP_EXIT_CODE)
    }

    /// Effective output settings (project > global)
    pub fn output(&self) -> OutputConfig {
        let mut output = self.global.output.clone().unwrap_or_default();
        if let Some(project_output) = &self.project.output {
            output.merge(project_output);
        }
        output
    }

    pub fn format(&self) -> OutputFormat {
        self.output().format.unwrap_or_default()
    }

    pub fn verbose(&self) -> bool {
        self.output().verbose.unwrap_or(false)
    }

    pub fn color(&self) -> bool {
        self.output().color.unwrap_or(true)
    }

    /// Skip gates in declaration order
    pub fn gates(&self) -> &[GateConfig] {
        &self.project.gates
    }
}
