//! Generator configuration.
//!
//! Loaded from an explicit JSON file, else `<config dir>/gendoc/config.json`
//! when present, else defaults. Environment variables are applied last.

use crate::docs::index::{IndexConfig, DEFAULT_MARKER};
use crate::shared::logging;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("unknown formatter backend {0:?}, expected \"builtin\" or \"terraform\"")]
    UnknownFormatter(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub index: IndexConfig,
    pub output: OutputConfig,
    pub formatter: FormatterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name and identifier prefix, e.g. `tencentcloud`.
    pub name: String,
    /// Name used in page titles, e.g. `TencentCloud`.
    pub display_name: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "tencentcloud".to_string(),
            display_name: "TencentCloud".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "website/docs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatterBackend {
    #[default]
    Builtin,
    Terraform,
}

impl FromStr for FormatterBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "builtin" => Ok(FormatterBackend::Builtin),
            "terraform" => Ok(FormatterBackend::Terraform),
            _ => Err(ConfigError::UnknownFormatter(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub backend: FormatterBackend,
    /// Terraform binary used by the `terraform` backend.
    pub executable_path: Option<String>,
}

impl Config {
    /// Index literals for the configured provider.
    ///
    /// An explicit `index.marker` wins; otherwise the provider name is the
    /// identifier marker.
    pub fn index_config(&self) -> IndexConfig {
        let mut index = self.index.clone();
        if index.marker == DEFAULT_MARKER {
            index.marker = self.provider.name.clone();
        }
        index
    }

    /// Prefix every entry name must start with, e.g. `tencentcloud_`.
    pub fn entry_prefix(&self) -> String {
        format!("{}_", self.index_config().marker)
    }
}

/// Default configuration, merged with the user config file if one exists.
pub fn init_default() -> Result<Config, ConfigError> {
    let config = match default_config_path() {
        Some(path) if path.is_file() => {
            logging::info(&format!("Using config file: {}", path.display()));
            load(&path)?
        }
        _ => Config::default(),
    };
    apply_env(config)
}

/// Configuration from an explicit file path.
pub fn init_from_path(path: &str) -> Result<Config, ConfigError> {
    apply_env(load(Path::new(path))?)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gendoc").join("config.json"))
}

fn load(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn apply_env(mut config: Config) -> Result<Config, ConfigError> {
    if let Ok(provider) = env::var("GENDOC_PROVIDER") {
        config.provider.name = provider;
    }
    if let Ok(dir) = env::var("GENDOC_OUTPUT_DIR") {
        config.output.directory = dir;
    }
    if let Ok(backend) = env::var("GENDOC_FORMATTER") {
        config.formatter.backend = backend.parse()?;
    }
    Ok(config)
}
