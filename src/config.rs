//! Bridge configuration using Figment
//!
//! Configuration is loaded from:
//! 1. Built-in defaults
//! 2. A TOML file (`config/pybridge.toml` unless another path is given)
//! 3. Environment variables (prefixed with `PYBRIDGE_`)
//!
//! A missing file is not an error; the defaults apply.
//!
//! # Environment Variable Overrides
//!
//! Nested keys are separated by a double underscore, so that key names may
//! contain single underscores:
//!
//! ```text
//! PYBRIDGE_LOGGING__LEVEL=debug
//! PYBRIDGE_LOGGING__JSON=true
//! PYBRIDGE_INTERPRETER__SEARCH_PATHS='["/opt/patches"]'
//! ```
//!
//! # Example
//!
//! ```no_run
//! use py_bridge::config::BridgeConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = BridgeConfig::load()?;
//!     println!("Log level: {}", config.logging.level);
//!     Ok(())
//! }
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BridgeError, BridgeResult};
use crate::scripting::SessionOptions;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/pybridge.toml";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "PYBRIDGE_";

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Interpreter session settings
    pub interpreter: InterpreterConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error)
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

/// Interpreter configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Directories appended to the module search path in every session, before
    /// the instance's own `path` input
    pub search_paths: Vec<PathBuf>,
    /// Top-level packages that are never evicted between sessions
    pub keep_modules: Vec<String>,
}

impl InterpreterConfig {
    /// Session options for an instance whose `path` input holds `path`.
    pub fn session_options(&self, path: Option<&str>) -> SessionOptions {
        let mut search_paths = self.search_paths.clone();
        if let Some(path) = path.filter(|p| !p.is_empty()) {
            search_paths.push(PathBuf::from(path));
        }
        SessionOptions {
            search_paths,
            keep_modules: self.keep_modules.clone(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

// ============================================================================
// Configuration Loading and Validation
// ============================================================================

impl BridgeConfig {
    /// Load configuration from `config/pybridge.toml` and environment variables
    ///
    /// # Errors
    ///
    /// Returns a `BridgeError` if the file cannot be parsed or validation fails.
    pub fn load() -> BridgeResult<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific file path
    ///
    /// Environment variables take precedence over the file, and the file over
    /// the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> BridgeResult<Self> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    ///
    /// Checks:
    /// - Log level is valid (trace, debug, info, warn, error)
    /// - Keep-module names are not empty
    pub fn validate(&self) -> BridgeResult<()> {
        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(BridgeError::ConfigValidation(format!(
                "Invalid logging level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LEVELS.join(", ")
            )));
        }

        if self.interpreter.keep_modules.iter().any(|m| m.trim().is_empty()) {
            return Err(BridgeError::ConfigValidation(
                "interpreter.keep_modules cannot contain empty names".to_string(),
            ));
        }

        Ok(())
    }
}
