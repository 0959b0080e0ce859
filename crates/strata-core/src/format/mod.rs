//! Configuration file formats.
//!
//! Every format parses into a flat [`Snapshot`]. Hierarchical formats (YAML,
//! JSON) are flattened to dot-delimited keys so all sources look alike to the
//! binding layer.

use std::path::Path;

use crate::config::Snapshot;
use crate::error::{ConfigError, Result};

pub mod flatten;
pub mod json;
pub mod properties;
pub mod yaml;

/// Supported configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    /// Java Properties format (.properties)
    Properties,
    /// YAML format (.yml, .yaml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl ConfigFormat {
    /// Guesses the format from a file extension (without dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "properties" => Some(ConfigFormat::Properties),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Detects the format from a file path based on extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Detects the format of `path`, falling back to properties for unknown
    /// or missing extensions.
    pub fn for_path(path: &Path) -> Self {
        Self::from_path(path).unwrap_or(ConfigFormat::Properties)
    }

    /// Returns the parser for this format.
    pub fn parser(&self) -> &'static dyn FormatParser {
        match self {
            ConfigFormat::Properties => &properties::PropertiesFormat,
            ConfigFormat::Yaml => &yaml::YamlFormat,
            ConfigFormat::Json => &json::JsonFormat,
        }
    }
}

/// A trait for parsing configuration from a string.
pub trait FormatParser: Send + Sync {
    /// Parses the input string into a flat snapshot.
    fn parse(&self, input: &str) -> Result<Snapshot>;
}

/// Reads and parses a configuration file, picking the format by extension.
///
/// A file that does not exist is a read error; content that does not parse
/// is a parse error naming the file.
pub fn parse_file(path: &Path) -> Result<Snapshot> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        let message = if e.kind() == std::io::ErrorKind::NotFound {
            "required configuration file is missing".to_string()
        } else {
            e.to_string()
        };
        ConfigError::read_with_cause(path.display().to_string(), message, e)
    })?;

    ConfigFormat::for_path(path)
        .parser()
        .parse(&content)
        .map_err(|e| match e {
            ConfigError::Parse { message, cause, .. } => ConfigError::Parse {
                source_name: path.display().to_string(),
                message,
                cause,
            },
            other => other,
        })
}
