//! Skip gates
//!
//! A gate ties a set of tests (by name substring) to an environment
//! variable. `require_env` skips matching tests unless the variable is
//! truthy, e.g. long-running tests behind `TALLY_LONG_TESTS=1`.
//! `skip_if_env` skips them when it is truthy, e.g. network tests on `CI`.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// One `[[gate]]` table from tally.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Substring of the test name; absent means every test
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Run matching tests only when this variable is truthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_env: Option<String>,

    /// Skip matching tests when this variable is truthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_if_env: Option<String>,

    /// Skip reason shown in the report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl GateConfig {
    /// Gate that runs matching tests only when `var` is truthy
    pub fn require_env(pattern: Option<&str>, var: &str) -> Self {
        Self {
            pattern: pattern.map(str::to_string),
            require_env: Some(var.to_string()),
            skip_if_env: None,
            reason: None,
        }
    }

    /// Gate that skips matching tests when `var` is truthy
    pub fn skip_if_env(pattern: Option<&str>, var: &str) -> Self {
        Self {
            pattern: pattern.map(str::to_string),
            require_env: None,
            skip_if_env: Some(var.to_string()),
            reason: None,
        }
    }

    /// Set the reason shown for tests this gate skips
    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }

    /// Whether this gate applies to the named test
    pub fn matches(&self, test_name: &str) -> bool {
        self.pattern
            .as_deref()
            .map_or(true, |pattern| test_name.contains(pattern))
    }

    /// Validate the gate; `index` locates it in error messages
    pub fn validate(&self, index: usize) -> ConfigResult<()> {
        let field = |name: &str| format!("gate[{}].{}", index, name);

        match (&self.require_env, &self.skip_if_env) {
            (Some(_), Some(_)) | (None, None) => {
                return Err(ConfigError::InvalidValue {
                    field: field("require_env"),
                    reason: "exactly one of 'require_env' or 'skip_if_env' must be set"
                        .to_string(),
                })
            }
            (Some(var), None) | (None, Some(var)) if var.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    field: field("env"),
                    reason: "variable name cannot be empty".to_string(),
                })
            }
            _ => {}
        }

        if let Some(pattern) = &self.pattern {
            if pattern.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field("pattern"),
                    reason: "pattern cannot be empty (omit it to match every test)".to_string(),
                });
            }
        }

        if let Some(reason) = &self.reason {
            if reason.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field("reason"),
                    reason: "reason cannot be blank".to_string(),
                });
            }
        }

        Ok(())
    }
}
