//! Configuration system
//!
//! Parser settings live in a plain serde struct so front ends can keep them
//! next to their own settings files (TOML or RON).

use std::path::{Path, PathBuf};

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        match format {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Supported settings file formats, picked by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Settings that shape one parse call
///
/// Passed explicitly to [`SceneParser::with_config`](crate::SceneParser::with_config);
/// nothing here is global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Deepest allowed nesting of tree groups below a top-level group
    pub max_depth: usize,

    /// Directory every mesh, texture and bump map path resolves against.
    ///
    /// When unset, mesh files resolve against the directory above the scene
    /// file's directory and texture maps against the scene file's directory.
    pub asset_root: Option<PathBuf>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            asset_root: None,
        }
    }
}

impl Config for ParserConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_config_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.max_depth, 64);
        assert!(config.asset_root.is_none());
    }

    #[test]
    fn test_parser_config_from_toml_fills_defaults() {
        let config: ParserConfig = toml::from_str("asset_root = \"/srv/assets\"").unwrap();
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.asset_root, Some(PathBuf::from("/srv/assets")));
    }

    #[test]
    fn test_parser_config_from_ron() {
        let config: ParserConfig = ron::from_str("(max_depth: 8)").unwrap();
        assert_eq!(config.max_depth, 8);
        assert!(config.asset_root.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir().join(format!("scenefile_parser_{}.ron", std::process::id()));
        let config = ParserConfig {
            max_depth: 12,
            asset_root: Some(PathBuf::from("/srv/assets")),
        };
        config.save_to_file(&path).unwrap();
        let loaded = ParserConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let err = ParserConfig::load_from_file("parser.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
