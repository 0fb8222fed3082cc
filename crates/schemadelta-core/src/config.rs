//! Configuration schema (schemadelta.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::diagnostic::DiagnosticCode;

/// Output presentation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Colorize change symbols on the terminal
    #[serde(default = "default_true")]
    pub color: bool,

    /// Print the summary block after the report lines
    #[serde(default = "default_true")]
    pub summary: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            summary: true,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Extra directories searched for referenced schemas
    #[serde(default)]
    pub reference_paths: Vec<PathBuf>,

    /// Diagnostic codes dropped before reporting
    #[serde(default)]
    pub suppress: Vec<DiagnosticCode>,

    #[serde(default)]
    pub output: OutputConfig,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_paths: Vec::new(),
            suppress: Vec::new(),
            output: OutputConfig::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    pub fn is_suppressed(&self, code: DiagnosticCode) -> bool {
        self.suppress.contains(&code)
    }

    /// Reference paths with relative entries resolved against the project root
    pub fn resolved_reference_paths(&self) -> Vec<PathBuf> {
        self.reference_paths
            .iter()
            .map(|p| if p.is_relative() { self.project_root.join(p) } else { p.clone() })
            .collect()
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
