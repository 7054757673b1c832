//! Serving configuration.
//!
//! Values are resolved in order: built-in defaults, an optional TOML file,
//! environment variables, and finally command-line flags (applied by the
//! binary).
//!
//! ```toml
//! model_path = "model/model_rossmann.json"
//! parameter_dir = "parameter"
//! log_filter = "rossmann_rs=debug,info"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`ServingConfig::model_path`].
pub const ENV_MODEL_PATH: &str = "ROSSMANN_MODEL_PATH";
/// Environment variable overriding [`ServingConfig::parameter_dir`].
pub const ENV_PARAMETER_DIR: &str = "ROSSMANN_PARAMETER_DIR";
/// Environment variable overriding [`ServingConfig::log_filter`].
pub const ENV_LOG_FILTER: &str = "ROSSMANN_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("cannot encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Where the artifacts live and how much to log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServingConfig {
    /// Model artifact, `.json` or `.bin`.
    pub model_path: PathBuf,
    /// Directory holding the five parameter artifacts.
    pub parameter_dir: PathBuf,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ServingConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model/model_rossmann.json"),
            parameter_dir: PathBuf::from("parameter"),
            log_filter: "info".to_string(),
        }
    }
}

impl ServingConfig {
    /// Parse a TOML document. Missing keys take their default.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load a TOML config file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply overrides from a variable lookup. Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name| lookup(name).filter(|v: &String| !v.trim().is_empty());
        if let Some(path) = get(ENV_MODEL_PATH) {
            self.model_path = PathBuf::from(path);
        }
        if let Some(dir) = get(ENV_PARAMETER_DIR) {
            self.parameter_dir = PathBuf::from(dir);
        }
        if let Some(filter) = get(ENV_LOG_FILTER) {
            self.log_filter = filter;
        }
        self
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Defaults, then `path` if given, then the environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::load_toml(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }
}
