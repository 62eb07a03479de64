//! Configuration types

use crate::error::{Error, Result};
use crate::unit::Manifest;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Amalgam configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project root path, unit paths are relative to it
    pub project_root: PathBuf,

    /// Output configuration
    pub output: OutputConfig,

    /// Extensions of header-style files
    pub header_extensions: Vec<String>,

    /// Ordered unit list
    pub manifest: Manifest,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            output: OutputConfig::default(),
            header_extensions: vec!["h".into(), "hpp".into()],
            manifest: Manifest::default(),
        }
    }
}

impl Config {
    /// Configuration for the catboost evaluation library
    pub fn builtin() -> Self {
        Self {
            manifest: Manifest::builtin(),
            ..Self::default()
        }
    }

    /// Load configuration from a YAML or JSON file, chosen by extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(Error::Config(format!(
                "{}: unknown config format (expected .yaml, .yml or .json)",
                path.display()
            ))),
        }
    }

    /// Parse configuration from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Parse configuration from JSON
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Render the configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Whether a file extension counts as header-style
    pub fn is_header_extension(&self, ext: &str) -> bool {
        self.header_extensions.iter().any(|e| e == ext)
    }

    /// Absolute-or-root-relative location of a unit path
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.project_root.join(path)
    }

    /// Destination directory for the artifacts
    pub fn output_dir(&self) -> PathBuf {
        self.project_root.join(&self.output.directory)
    }

    /// Final path of the generated header
    pub fn header_path(&self) -> PathBuf {
        self.output_dir().join(&self.output.header_name)
    }

    /// Final path of the generated implementation file
    pub fn source_path(&self) -> PathBuf {
        self.output_dir().join(&self.output.source_name)
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination directory, relative to the project root unless absolute
    pub directory: PathBuf,

    /// File name of the generated header
    pub header_name: String,

    /// File name of the generated implementation file
    pub source_name: String,

    /// Generator name shown in the disclaimer banner
    pub generator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("amalgamated"),
            header_name: "catboost.h".into(),
            source_name: "catboost.cpp".into(),
            generator: "amalgamate".into(),
        }
    }
}
