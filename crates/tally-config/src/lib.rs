//! Tally Configuration System
//!
//! Provides configuration management for tally test runs:
//! - Project configuration (tally.toml)
//! - Global user configuration (~/.tally/config.toml)
//! - Skip gates driven by environment variables
//! - Configuration precedence and merging
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Global config (~/.tally/config.toml)
//! 2. Project config (./tally.toml)
//! 3. Environment variables (TALLY_*)
//! 4. CLI flags
//!
//! # Example
//!
//! ```no_run
//! use tally_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("tests live in {}", config.test_dir().display());
//! ```

pub mod gate;
pub mod global;
pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Interpret an environment-style flag value
///
/// `1`, `true`, `yes` and `on` (any case) are truthy; everything else,
/// including the empty string, is not.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// Re-export main types
pub use gate::GateConfig;
pub use global::{GlobalConfig, OutputConfig, OutputFormat};
pub use loader::{Config, ConfigLoader};
pub use project::{ProjectConfig, RunConfig};
