//! Configuration file support for persistent settings.
//!
//! This module provides support for loading configuration from a TOML file
//! located at `~/.config/sizes/config.toml` (or the platform-specific
//! equivalent). Configuration file values serve as defaults that can be
//! overridden by CLI arguments.
//!
//! # Layering
//!
//! The precedence order is: **CLI argument > config file > hardcoded default**.
//!
//! # Example config
//!
//! ```toml
//! dir = "~"
//!
//! [scanning]
//! exclude = ["node_modules", ".git"]
//! squash_hardlinks = true
//! one_file_system = true
//! max_depth = 3
//! verbose = false
//!
//! [display]
//! unit = "human"
//! commify = false
//! absolute = false
//! vim = false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration file structure.
///
/// All fields are `Option<T>` so we can detect which values are present in the
/// config file and apply layered configuration (CLI > config file > defaults).
#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    /// Default root to scan
    pub dir: Option<PathBuf>,

    /// Traversal options
    #[serde(default)]
    pub scanning: FileScanConfig,

    /// Report options
    #[serde(default)]
    pub display: FileDisplayConfig,
}

/// Traversal options from the configuration file.
#[derive(Deserialize, Default, Debug)]
pub struct FileScanConfig {
    /// Entry names to skip at any depth
    pub exclude: Option<Vec<String>>,

    /// Whether hard links are counted once
    pub squash_hardlinks: Option<bool>,

    /// Whether to stay on the root's device
    pub one_file_system: Option<bool>,

    /// Depth cutoff for grouping and display
    pub max_depth: Option<usize>,

    /// Whether to report unreadable entries
    pub verbose: Option<bool>,
}

/// Report options from the configuration file.
#[derive(Deserialize, Default, Debug)]
pub struct FileDisplayConfig {
    /// Unit name (`"bytes"`, `"kilobytes"`, `"megabytes"`, `"gigabytes"`, `"human"`)
    pub unit: Option<String>,

    /// Whether to insert thousands separators
    pub commify: Option<bool>,

    /// Whether to print absolute paths
    pub absolute: Option<bool>,

    /// Whether to append the vim fold modeline
    pub vim: Option<bool>,
}

/// Expand a leading `~` in a path to the user's home directory.
///
/// Paths that don't start with `~` are returned unchanged.
///
/// # Examples
///
/// ```
/// # use std::path::PathBuf;
/// # use sizes::config::file::expand_tilde;
/// let absolute = PathBuf::from("/absolute/path");
/// assert_eq!(expand_tilde(&absolute), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

impl FileConfig {
    /// Returns the path where the configuration file is expected.
    ///
    /// The configuration file is located at `<config_dir>/sizes/config.toml`,
    /// where `<config_dir>` is the platform-specific configuration directory
    /// (e.g., `~/.config` on Linux, `%APPDATA%` on Windows).
    ///
    /// # Returns
    ///
    /// `Some(PathBuf)` with the config file path, or `None` if the config
    /// directory cannot be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sizes").join("config.toml"))
    }

    /// Load configuration from the default config file location.
    ///
    /// If the config file doesn't exist, returns a default (empty) configuration.
    /// If the file exists but is malformed, returns an error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file exists but cannot be read
    /// - The config file exists but contains invalid TOML or unexpected fields
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this structure.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file at {}: {e}", path.display())
        })?;

        toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file at {}: {e}", path.display())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_file_config() {
        let config = FileConfig::default();

        assert!(config.dir.is_none());
        assert!(config.scanning.exclude.is_none());
        assert!(config.scanning.squash_hardlinks.is_none());
        assert!(config.scanning.one_file_system.is_none());
        assert!(config.scanning.max_depth.is_none());
        assert!(config.scanning.verbose.is_none());
        assert!(config.display.unit.is_none());
        assert!(config.display.commify.is_none());
        assert!(config.display.absolute.is_none());
        assert!(config.display.vim.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
dir = "~/src"

[scanning]
exclude = ["node_modules", ".git"]
squash_hardlinks = false
one_file_system = false
max_depth = 2
verbose = true

[display]
unit = "megabytes"
commify = true
absolute = true
vim = true
"#;

        let config: FileConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.dir, Some(PathBuf::from("~/src")));
        assert_eq!(
            config.scanning.exclude,
            Some(vec!["node_modules".to_string(), ".git".to_string()])
        );
        assert_eq!(config.scanning.squash_hardlinks, Some(false));
        assert_eq!(config.scanning.one_file_system, Some(false));
        assert_eq!(config.scanning.max_depth, Some(2));
        assert_eq!(config.scanning.verbose, Some(true));
        assert_eq!(config.display.unit, Some("megabytes".to_string()));
        assert_eq!(config.display.commify, Some(true));
        assert_eq!(config.display.absolute, Some(true));
        assert_eq!(config.display.vim, Some(true));
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r"
[display]
commify = true
";

        let config: FileConfig = toml::from_str(toml_content).unwrap();

        assert!(config.dir.is_none());
        assert_eq!(config.display.commify, Some(true));
        assert!(config.display.unit.is_none());
        assert!(config.scanning.exclude.is_none());
    }

    #[test]
    fn test_parse_empty_config() {
        let config: FileConfig = toml::from_str("").unwrap();

        assert!(config.dir.is_none());
        assert!(config.scanning.max_depth.is_none());
    }

    #[test]
    fn test_malformed_config_errors() {
        let toml_content = r#"
[scanning]
max_depth = "deep"
"#;
        assert!(toml::from_str::<FileConfig>(toml_content).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[scanning]\nexclude = [\"target\"]\n").unwrap();

        let config = FileConfig::load_from(&path).unwrap();
        assert_eq!(config.scanning.exclude, Some(vec!["target".to_string()]));
    }

    #[test]
    fn test_load_from_malformed_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[display\n").unwrap();

        let err = FileConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_path_returns_expected_suffix() {
        if let Some(p) = FileConfig::config_path() {
            assert!(p.ends_with(Path::new("sizes").join("config.toml")));
        }
    }

    #[test]
    fn test_expand_tilde_with_home() {
        let expanded = expand_tilde(&PathBuf::from("~/Projects"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("Projects"));
        }
    }

    #[test]
    fn test_expand_tilde_bare() {
        let expanded = expand_tilde(&PathBuf::from("~"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home);
        }
    }

    #[test]
    fn test_expand_tilde_leaves_other_paths() {
        let absolute = PathBuf::from("/usr/local/bin");
        assert_eq!(expand_tilde(&absolute), absolute);

        let relative = PathBuf::from("some/relative/path");
        assert_eq!(expand_tilde(&relative), relative);
    }
}
