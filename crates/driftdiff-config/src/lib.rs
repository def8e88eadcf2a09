//! Host configuration for driftdiff: a TOML file carrying engine option
//! overrides, loaded from `~/.config/driftdiff/config.toml` or an explicit
//! path. A missing file is not an error; a malformed one is.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use driftdiff_engine::DiffOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Engine options, merged over the engine defaults.
    #[serde(default)]
    pub diff: DiffOptions,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> std::io::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(config_path, content)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/driftdiff");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_path_expands_tilde() {
        let path = Config::config_path();
        let path_str = path.to_string_lossy();
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/driftdiff/config.toml"));
    }

    #[test]
    fn missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load_from_path(dir.path().join("nope.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn roundtrip_preserves_options() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            diff: DiffOptions {
                full_diff: true,
                recursion_max: 4,
                clip_chars_left: 250,
                ..DiffOptions::default()
            },
        };
        config.save_to_path(&path).unwrap();
        let loaded = Config::load_from_path(&path).unwrap().unwrap();
        assert!(loaded.diff.full_diff);
        assert_eq!(loaded.diff.recursion_max, 4);
        assert_eq!(loaded.diff.clip_chars_left, 250);
        // Untouched keys keep engine defaults.
        assert!(loaded.diff.show_block_moves);
    }

    #[test]
    fn partial_table_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[diff]\nchar_diff = false\n").unwrap();
        let loaded = Config::load_from_path(&path).unwrap().unwrap();
        assert!(!loaded.diff.char_diff);
        assert_eq!(loaded.diff.block_min_length, 3);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[diff\nbroken").unwrap();
        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }
}
