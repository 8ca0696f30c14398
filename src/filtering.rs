//! Per-entry filtering during a scan.
//!
//! This module decides, for every entry the walker visits, whether it is
//! counted, skipped, pruned together with its subtree, or counted as a
//! zero-byte duplicate of a hard link seen earlier.

use std::{collections::HashSet, fs::Metadata};

use crate::config::TraversalConfig;

/// The stat fields the filter and the walker need for one entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct EntryMeta {
    /// Device the entry resides on
    pub device: u64,

    /// Inode number on that device
    pub inode: u64,

    /// Size in bytes as reported by `lstat`
    pub size: u64,

    /// Whether the entry is a directory
    pub is_dir: bool,

    /// Whether the entry is a regular file
    pub is_file: bool,
}

impl EntryMeta {
    /// Extract the relevant fields from filesystem metadata.
    ///
    /// On platforms without device and inode numbers both are reported as
    /// `0`, which disables hard-link squashing and device confinement.
    #[must_use]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        #[cfg(unix)]
        let (device, inode) = {
            use std::os::unix::fs::MetadataExt;
            (metadata.dev(), metadata.ino())
        };
        #[cfg(not(unix))]
        let (device, inode) = (0, 0);

        Self {
            device,
            inode,
            size: metadata.len(),
            is_dir: metadata.is_dir(),
            is_file: metadata.is_file(),
        }
    }

    /// A synthetic regular file.
    #[must_use]
    pub const fn file(device: u64, inode: u64, size: u64) -> Self {
        Self {
            device,
            inode,
            size,
            is_dir: false,
            is_file: true,
        }
    }

    /// A synthetic directory.
    #[must_use]
    pub const fn dir(device: u64, inode: u64) -> Self {
        Self {
            device,
            inode,
            size: 0,
            is_dir: true,
            is_file: false,
        }
    }

    /// Identity used for hard-link squashing.
    #[must_use]
    pub const fn key(&self) -> InodeKey {
        InodeKey {
            device: self.device,
            inode: self.inode,
        }
    }
}

/// `(device, inode)` pair identifying the storage behind a file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InodeKey {
    pub device: u64,
    pub inode: u64,
}

/// What the walker should do with a visited entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Count the entry normally
    Include,

    /// Skip the entry and everything below it (cross-device)
    ExcludeSubtree,

    /// Skip only this entry (a path segment is excluded by name)
    ExcludeSelf,

    /// Record the entry with zero bytes; its inode was already counted
    Deduplicate,
}

/// Stateful filter applied to each entry of one traversal.
///
/// Holds the exclusion names and the set of inodes already counted. The
/// filter never touches the filesystem; callers pass the stat data in.
#[derive(Debug)]
pub struct PathFilter {
    exclude: HashSet<String>,
    squash_hardlinks: bool,
    root_device: Option<u64>,
    seen: HashSet<InodeKey>,
}

impl PathFilter {
    /// Build a filter from a traversal configuration.
    ///
    /// Device confinement is active only if the config carries a root
    /// device, i.e. it was resolved with one-file-system enabled.
    #[must_use]
    pub fn new(config: &TraversalConfig) -> Self {
        Self {
            exclude: config.exclude.iter().cloned().collect(),
            squash_hardlinks: config.squash_hardlinks,
            root_device: config.root_device().filter(|_| config.one_file_system),
            seen: HashSet::new(),
        }
    }

    /// Classify one entry.
    ///
    /// `segments` is the path of the entry relative to the traversal root
    /// (empty for the root itself). Checks run in order: excluded name,
    /// foreign device, already-counted inode.
    pub fn classify(&mut self, segments: &[String], meta: &EntryMeta) -> FilterOutcome {
        if self.is_excluded(segments) {
            return FilterOutcome::ExcludeSelf;
        }

        if self.root_device.is_some_and(|root| root != meta.device) {
            return FilterOutcome::ExcludeSubtree;
        }

        // Inode 0 means the platform gave us none.
        if self.squash_hardlinks
            && meta.is_file
            && meta.inode != 0
            && !self.seen.insert(meta.key())
        {
            return FilterOutcome::Deduplicate;
        }

        FilterOutcome::Include
    }

    /// Whether any segment of the relative path matches an excluded name.
    #[must_use]
    pub fn is_excluded(&self, segments: &[String]) -> bool {
        !self.exclude.is_empty() && segments.iter().any(|s| self.exclude.contains(s))
    }

    /// Number of distinct inodes counted so far.
    #[must_use]
    pub fn seen_inodes(&self) -> usize {
        self.seen.len()
    }
}
