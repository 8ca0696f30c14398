//! Directory traversal and size aggregation.
//!
//! This module walks the tree below the configured root depth-first, runs
//! every entry through the [`PathFilter`] and records the sizes that survive
//! into a [`SizeTree`]. Unreadable entries are skipped and counted; they
//! never abort the walk.

use std::{
    path::{Component, Path},
    time::Duration,
};

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use crate::{
    config::TraversalConfig,
    filtering::{EntryMeta, FilterOutcome, PathFilter},
    tree::SizeTree,
};

/// How often the progress spinner message is refreshed, in entries.
const PROGRESS_INTERVAL: usize = 256;

/// Per-entry decision returned to the walk loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalControl {
    /// The entry was recorded; keep walking into it
    Continue,

    /// Do not descend below this entry
    SkipSubtree,

    /// The entry was not recorded, but its children are still visited
    SkipSelf,
}

/// Counters collected during one scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Entries recorded into the tree (duplicates included)
    pub recorded: usize,

    /// Entries skipped because a path segment is excluded
    pub excluded: usize,

    /// Subtrees pruned for living on another device
    pub pruned: usize,

    /// Hard links recorded with zero bytes
    pub deduplicated: usize,

    /// Entries that could not be read
    pub unreadable: usize,
}

/// Result of a completed scan.
#[derive(Debug)]
pub struct ScanResult {
    /// Aggregated sizes below the root
    pub tree: SizeTree,

    /// Walk counters
    pub stats: ScanStats,
}

/// Depth-first scanner producing a [`SizeTree`].
///
/// A scanner owns its [`TraversalConfig`]; each call to [`Scanner::scan`]
/// starts from a fresh tree and a fresh hard-link set.
#[derive(Debug)]
pub struct Scanner {
    /// Resolved traversal configuration
    config: TraversalConfig,

    /// When `true`, draws a spinner on stderr while walking.
    progress: bool,
}

impl Scanner {
    /// Create a new scanner for a resolved configuration.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use sizes::{config::TraversalConfig, scanner::Scanner};
    /// # fn main() -> anyhow::Result<()> {
    /// let config = TraversalConfig::new(".").resolve()?;
    /// let result = Scanner::new(config).scan();
    /// println!("{} bytes", result.tree.total_bytes());
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub const fn new(config: TraversalConfig) -> Self {
        Self {
            config,
            progress: false,
        }
    }

    /// Enable or disable the progress spinner.
    #[must_use]
    pub const fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// The configuration this scanner walks with.
    #[must_use]
    pub const fn config(&self) -> &TraversalConfig {
        &self.config
    }

    /// Walk the filesystem below the configured root.
    ///
    /// Symbolic links are never followed (except a symlinked root), so a
    /// link contributes the size of the link itself. Entries within a
    /// directory are visited in file-name order, which decides which name
    /// of a hard-linked file carries its bytes.
    ///
    /// # Panics
    ///
    /// This method may panic if the progress bar template string is invalid,
    /// though this should not occur as the template is hardcoded and valid.
    pub fn scan(&self) -> ScanResult {
        let mut walk = Walk::new(&self.config);
        let progress = self.progress_bar();
        let root = self.config.root.as_path();

        let mut entries = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(next) = entries.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(err) => {
                    walk.unreadable(&progress, &err.to_string());
                    continue;
                }
            };

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    walk.unreadable(&progress, &err.to_string());
                    continue;
                }
            };

            let segments = relative_segments(root, entry.path());
            let control = walk.visit(&segments, &EntryMeta::from_metadata(&metadata));

            if control == TraversalControl::SkipSubtree && entry.file_type().is_dir() {
                entries.skip_current_dir();
            }

            let seen = walk.seen();
            if seen % PROGRESS_INTERVAL == 0 {
                progress.set_message(format!("Scanning... {seen} entries"));
            }
        }

        progress.finish_and_clear();
        walk.finish()
    }

    /// Run the filter and aggregation over a synthetic depth-first sequence
    /// of `(relative segments, metadata)` pairs.
    ///
    /// Entries below a pruned subtree are recognised by path prefix and
    /// dropped, mirroring what [`Scanner::scan`] does on a real walk.
    pub fn scan_entries<I>(&self, entries: I) -> ScanResult
    where
        I: IntoIterator<Item = (Vec<String>, EntryMeta)>,
    {
        let mut walk = Walk::new(&self.config);
        let mut pruned: Option<Vec<String>> = None;

        for (segments, meta) in entries {
            if let Some(prefix) = &pruned {
                if segments.starts_with(prefix) {
                    continue;
                }
                pruned = None;
            }

            if walk.visit(&segments, &meta) == TraversalControl::SkipSubtree {
                pruned = Some(segments);
            }
        }

        walk.finish()
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message("Scanning...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Mutable state of one walk: the filter, the tree and the counters.
struct Walk<'a> {
    config: &'a TraversalConfig,
    filter: PathFilter,
    tree: SizeTree,
    stats: ScanStats,
}

impl<'a> Walk<'a> {
    fn new(config: &'a TraversalConfig) -> Self {
        Self {
            config,
            filter: PathFilter::new(config),
            tree: SizeTree::new(),
            stats: ScanStats::default(),
        }
    }

    /// Filter one entry and record its effective size.
    ///
    /// Directories contribute nothing directly. The recorded path is cut to
    /// `max_depth` segments so deeper entries fold into their ancestor.
    fn visit(&mut self, segments: &[String], meta: &EntryMeta) -> TraversalControl {
        let outcome = self.filter.classify(segments, meta);

        let size = match outcome {
            FilterOutcome::ExcludeSubtree => {
                self.stats.pruned += 1;
                return TraversalControl::SkipSubtree;
            }
            FilterOutcome::ExcludeSelf => {
                self.stats.excluded += 1;
                return TraversalControl::SkipSelf;
            }
            FilterOutcome::Deduplicate => {
                self.stats.deduplicated += 1;
                0
            }
            FilterOutcome::Include if meta.is_dir => 0,
            FilterOutcome::Include => meta.size,
        };

        let depth = self
            .config
            .max_depth
            .map_or(segments.len(), |max| max.min(segments.len()));
        self.tree.record(&segments[..depth], size);
        self.stats.recorded += 1;

        TraversalControl::Continue
    }

    fn unreadable(&mut self, progress: &ProgressBar, message: &str) {
        self.stats.unreadable += 1;

        if self.config.verbose {
            progress.suspend(|| eprintln!("{} {message}", "Warning: skipping".yellow()));
        }
    }

    const fn seen(&self) -> usize {
        self.stats.recorded + self.stats.excluded + self.stats.pruned + self.stats.unreadable
    }

    fn finish(self) -> ScanResult {
        ScanResult {
            tree: self.tree,
            stats: self.stats,
        }
    }
}

/// Split `path` below `root` into its name segments.
fn relative_segments(root: &Path, path: &Path) -> Vec<String> {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}
