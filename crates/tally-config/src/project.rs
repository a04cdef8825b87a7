//! Project Configuration (tally.toml)
//!
//! Handles project-level configuration stored in `tally.toml` at the project root.

use crate::gate::GateConfig;
use crate::global::OutputConfig;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default directory searched for test scripts
pub const DEFAULT_TEST_DIR: &str = "tests";

/// Default file-name prefix of test scripts
pub const DEFAULT_PREFIX: &str = "test";

/// Exit status a test script uses to report that it skipped itself
pub const DEFAULT_SKIP_EXIT_CODE: i32 = 77;

/// Project configuration from tally.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Test discovery and execution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunConfig>,

    /// Output preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,

    /// Skip gates, checked in order
    #[serde(default, rename = "gate")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gates: Vec<GateConfig>,
}

/// Run configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Test directory, relative to the project root (default: "tests")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Test script prefix; matches "<prefix>-*" and "<prefix>_*" (default: "test")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Program used to launch each script (e.g. "sh")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<String>,

    /// Number of parallel workers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Run every test on one worker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequential: Option<bool>,

    /// Exit status meaning "skipped" (default: 77)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_exit_code: Option<i32>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(run) = &self.run {
            if run.workers == Some(0) {
                return Err(ConfigError::InvalidValue {
                    field: "run.workers".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }

            if let Some(prefix) = &run.prefix {
                if prefix.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "run.prefix".to_string(),
                        reason: "prefix cannot be empty".to_string(),
                    });
                }
            }

            if let Some(interpreter) = &run.interpreter {
                if interpreter.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "run.interpreter".to_string(),
                        reason: "interpreter cannot be empty".to_string(),
                    });
                }
            }

            if let Some(code) = run.skip_exit_code {
                if !(1..=255).contains(&code) {
                    return Err(ConfigError::InvalidValue {
                        field: "run.skip_exit_code".to_string(),
                        reason: format!(
                            "{} is not a usable exit status (expected 1 to 255; 0 means success)",
                            code
                        ),
                    });
                }
            }
        }

        for (index, gate) in self.gates.iter().enumerate() {
            gate.validate(index)?;
        }

        Ok(())
    }

    /// Run settings, or defaults when `[run]` is absent
    pub fn run_config(&self) -> RunConfig {
        self.run.clone().unwrap_or_default()
    }
}
