//! Traversal configuration for the directory walk.
//!
//! This module defines the options that control which entries are visited
//! and how their sizes are accounted for during a scan.

use std::{collections::BTreeSet, fs, path::PathBuf};

use anyhow::{Context, Result, bail};

use crate::filtering::EntryMeta;

/// Configuration for a single traversal.
///
/// Built once before the walk begins and never modified afterwards. Call
/// [`TraversalConfig::resolve`] to validate the root and capture its device
/// id before handing the config to a [`crate::scanner::Scanner`].
#[derive(Clone, Debug)]
pub struct TraversalConfig {
    /// Directory (or file) to scan
    pub root: PathBuf,

    /// Entry names skipped at any depth
    pub exclude: BTreeSet<String>,

    /// Count each `(device, inode)` pair only once
    pub squash_hardlinks: bool,

    /// Stay on the device the root lives on
    pub one_file_system: bool,

    /// Fold entries deeper than this into their ancestor at the cutoff
    pub max_depth: Option<usize>,

    /// Report unreadable entries while walking
    pub verbose: bool,

    root_device: Option<u64>,
}

impl TraversalConfig {
    /// Create a configuration for `root` with the default flags
    /// (squashing and one-file-system on, no exclusions, unlimited depth).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude: BTreeSet::new(),
            squash_hardlinks: true,
            one_file_system: true,
            max_depth: None,
            verbose: false,
            root_device: None,
        }
    }

    /// Validate the root path and capture its device id.
    ///
    /// # Errors
    ///
    /// Returns an error if the root does not exist or cannot be stat'd.
    pub fn resolve(mut self) -> Result<Self> {
        if fs::symlink_metadata(&self.root).is_err() {
            bail!("Root path does not exist: {}", self.root.display());
        }

        let metadata = fs::metadata(&self.root)
            .with_context(|| format!("Failed to read root path {}", self.root.display()))?;

        if self.one_file_system {
            self.root_device = Some(EntryMeta::from_metadata(&metadata).device);
        }

        Ok(self)
    }

    /// Pin the root device explicitly, for walks over synthetic entries.
    #[must_use]
    pub const fn with_root_device(mut self, device: u64) -> Self {
        self.root_device = Some(device);
        self
    }

    /// Device id of the root, present once resolved with one-file-system on.
    #[must_use]
    pub const fn root_device(&self) -> Option<u64> {
        self.root_device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = TraversalConfig::new("/tmp");

        assert!(config.squash_hardlinks);
        assert!(config.one_file_system);
        assert!(config.exclude.is_empty());
        assert!(config.max_depth.is_none());
        assert!(!config.verbose);
        assert!(config.root_device().is_none());
    }

    #[test]
    fn test_resolve_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let err = TraversalConfig::new(&missing).resolve().unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_resolve_captures_root_device() {
        let temp_dir = TempDir::new().unwrap();

        let config = TraversalConfig::new(temp_dir.path()).resolve().unwrap();
        assert!(config.root_device().is_some());
    }

    #[test]
    fn test_resolve_without_one_file_system_skips_device() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = TraversalConfig::new(temp_dir.path());
        config.one_file_system = false;

        let config = config.resolve().unwrap();
        assert!(config.root_device().is_none());
    }

    #[test]
    fn test_with_root_device() {
        let config = TraversalConfig::new("/").with_root_device(7);
        assert_eq!(config.root_device(), Some(7));
    }
}
