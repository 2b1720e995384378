//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - Environment variables
//!
//! Command-line flags are applied on top by the handlers.

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::logging::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use textforge_core::{Pipeline, DEFAULT_TRANSFORMS};
use textforge_server::ServerConfig;

/// Environment variable holding a comma-separated default transformation list
pub const ENV_TRANSFORMS: &str = "TEXTFORGE_TRANSFORMS";

/// Environment variable overriding `server.listen_addr`
pub const ENV_LISTEN_ADDR: &str = "TEXTFORGE_LISTEN_ADDR";

const APP_DIR: &str = "textforge";
const PROJECT_CONFIG: &str = ".textforge.yaml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Defaults applied when a request names no transformations
    pub defaults: DefaultsConfig,

    /// HTTP adapter settings
    pub server: ServerConfig,

    /// Logging settings
    pub logging: LoggingSettings,

    /// Output settings
    pub output: OutputConfig,
}

/// Default transformation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Transformations applied when none are given
    pub transforms: Vec<String>,
}

/// Logging settings from the config file; flags and environment win
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Log format (compact, full, json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<LogFormat>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format used when `--output` is not given
    pub format: OutputFormat,

    /// Use colored output when the terminal supports it
    pub color: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            transforms: DEFAULT_TRANSFORMS.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
        }
    }
}

/// Serialization format of a config file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Yaml,
    Json,
    Toml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
            Self::Toml => "TOML",
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let format = FileFormat::from_path(path);

        let parsed = match format {
            FileFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            FileFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
            FileFormat::Toml => toml::from_str(&content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|reason| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: format!("{} configuration ({reason})", format.name()),
        })
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        match Self::default_config_paths().into_iter().find(|p| p.exists()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file or default locations,
    /// then apply environment overrides
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::load()?,
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply `TEXTFORGE_*` environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(transforms) = std::env::var(ENV_TRANSFORMS) {
            let names: Vec<String> = transforms
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            if !names.is_empty() {
                self.defaults.transforms = names;
            }
        }

        if let Ok(listen_addr) = std::env::var(ENV_LISTEN_ADDR) {
            self.server.listen_addr = listen_addr;
        }
    }

    /// Get default configuration file paths to check, in priority order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(PROJECT_CONFIG),
            PathBuf::from(".textforge.yml"),
            PathBuf::from(".textforge.json"),
            PathBuf::from(".textforge.toml"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let app_dir = config_dir.join(APP_DIR);
            paths.push(app_dir.join("config.yaml"));
            paths.push(app_dir.join("config.json"));
            paths.push(app_dir.join("config.toml"));
        }

        paths
    }

    /// Path of the user-level config file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.yaml"))
    }

    /// Path of the project-level config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(PROJECT_CONFIG)
    }

    /// Check that the configuration can actually be used
    pub fn validate(&self) -> Result<()> {
        Pipeline::resolve(&self.defaults.transforms)?;

        if self.server.listen_addr.trim().is_empty() {
            return Err(Error::config("server.listen_addr may not be empty"));
        }
        if self.server.max_body_bytes == 0 {
            return Err(Error::config("server.max_body_bytes must be positive"));
        }

        Ok(())
    }

    /// Render the configuration in the given file format
    pub fn render(&self, path_hint: &Path) -> Result<String> {
        let content = match FileFormat::from_path(path_hint) {
            FileFormat::Yaml => serde_yaml::to_string(self)?,
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
        };
        Ok(content)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.render(path)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}
