// Licensed under MIT. See LICENSE for details.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Settings for job runs. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory job outputs are written to, created on demand.
    pub output_dir: PathBuf,
    /// Extension of AST job outputs.
    pub ast_extension: String,
    /// Extension of KeYmaeraX conversion outputs.
    pub keymaerax_extension: String,
    /// `EnvFilter` directive used unless RUST_LOG is set.
    pub log_filter: String,
    /// Inputs echoed into logs are cut to this many characters.
    pub log_truncation: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: PathBuf::from("output"),
            ast_extension: String::from("txt"),
            keymaerax_extension: String::from("kyx"),
            log_filter: String::from("info"),
            log_truncation: 50,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ast_extension.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "ast_extension",
                message: String::from("must not be empty"),
            });
        }
        if self.keymaerax_extension.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "keymaerax_extension",
                message: String::from("must not be empty"),
            });
        }
        if self.log_truncation < 4 {
            return Err(ConfigError::Invalid {
                field: "log_truncation",
                message: format!("must be at least 4, got {}", self.log_truncation),
            });
        }
        Ok(())
    }
}
