//! Command-line interface definition and argument parsing.
//!
//! This module defines all command-line arguments, options, and their validation
//! using the [clap](https://docs.rs/clap/) library. It provides structured access
//! to user input and handles argument conflicts and defaults.
//!
//! Helper methods on [`Cli`] accept a [`FileConfig`] reference so that config-file
//! values act as defaults that CLI arguments can override (layered config).

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{ArgAction, Parser, ValueEnum};

use sizes::config::file::{FileConfig, expand_tilde};
use sizes::config::{DisplayOptions, TraversalConfig, Unit};

/// Command-line arguments controlling the traversal.
#[derive(Parser)]
struct ScanningArgs {
    /// Entry name to skip at any depth (repeatable)
    ///
    /// Matching is by exact name against every path segment below the root,
    /// so `--exclude node_modules` hides every `node_modules` in the tree.
    #[arg(long, value_name = "NAME", action = ArgAction::Append)]
    exclude: Vec<String>,

    /// Count a hard-linked file's size only once (default)
    #[arg(long, overrides_with = "no_squash_hardlinks")]
    squash_hardlinks: bool,

    /// Count every name of a hard-linked file
    #[arg(long, overrides_with = "squash_hardlinks")]
    no_squash_hardlinks: bool,

    /// Stay on the filesystem the root lives on (default)
    #[arg(short = 'x', long, overrides_with = "no_one_file_system")]
    one_file_system: bool,

    /// Descend into other mounted filesystems
    #[arg(long, overrides_with = "one_file_system")]
    no_one_file_system: bool,

    /// Group and display entries at most this many levels below the root
    ///
    /// Deeper entries are folded into their ancestor at the cutoff.
    /// `--max-depth 0` prints only the grand total.
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Report entries that could not be read, and a scan summary
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Command-line arguments controlling the report.
#[derive(Parser)]
#[allow(clippy::struct_excessive_bools)]
struct DisplayArgs {
    /// Print sizes in bytes
    #[arg(short = 'b', long, group = "unit")]
    bytes: bool,

    /// Print sizes in kilobytes (1000 bytes)
    #[arg(short = 'k', long, group = "unit")]
    kilobytes: bool,

    /// Print sizes in megabytes
    #[arg(short = 'm', long, group = "unit")]
    megabytes: bool,

    /// Print sizes in gigabytes
    #[arg(short = 'g', long, group = "unit")]
    gigabytes: bool,

    /// Pick a unit per value (default)
    #[arg(short = 'h', long, group = "unit")]
    human: bool,

    /// Insert thousands separators
    #[arg(long, overrides_with = "no_commify")]
    commify: bool,

    /// Do not insert thousands separators (default)
    #[arg(long, overrides_with = "commify")]
    no_commify: bool,

    /// Label entries with full paths, indented from the filesystem root
    #[arg(long, overrides_with = "no_absolute")]
    absolute: bool,

    /// Label entries relative to the scanned root (default)
    #[arg(long, overrides_with = "absolute")]
    no_absolute: bool,

    /// Append a vim fold modeline to the report
    #[arg(long)]
    vim: bool,

    /// Write the report to a temporary file and open it in $EDITOR
    #[arg(long)]
    edit: bool,
}

/// Config file actions.
///
/// These are flags rather than subcommands so that every bare word on the
/// command line is a directory to scan (`sizes config` scans `./config`).
#[derive(Parser)]
struct ConfigArgs {
    /// Print the effective configuration (file values + defaults for unset keys)
    #[arg(long, group = "config_action")]
    config_show: bool,

    /// Write a commented config.toml if none exists yet
    #[arg(long, group = "config_action")]
    config_init: bool,

    /// Print the path to the config file
    #[arg(long, group = "config_action")]
    config_path: bool,
}

/// A config file action requested instead of a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// `--config-show`
    Show,
    /// `--config-init`
    Init,
    /// `--config-path`
    Path,
}

/// Main command-line interface structure.
///
/// `-h` selects human-readable units, so help is only available as `--help`.
#[derive(Parser)]
#[command(name = "sizes")]
#[command(about = "Show a directory tree sorted by cumulative size")]
#[command(version)]
#[command(author)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Directory to scan (defaults to the current directory)
    #[arg(value_name = "DIR", conflicts_with = "dir_flag")]
    dir: Option<PathBuf>,

    /// Directory to scan
    #[arg(long = "dir", value_name = "DIR")]
    dir_flag: Option<PathBuf>,

    /// Print help
    #[allow(dead_code)]
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Scanning options
    #[command(flatten)]
    scanning: ScanningArgs,

    /// Display options
    #[command(flatten)]
    display: DisplayArgs,

    /// Config file options
    #[command(flatten)]
    config: ConfigArgs,
}

/// Resolve a `--flag` / `--no-flag` pair against the config file and default.
fn flag_pair(yes: bool, no: bool, config: Option<bool>, default: bool) -> bool {
    if yes {
        true
    } else if no {
        false
    } else {
        config.unwrap_or(default)
    }
}

impl Cli {
    /// The config file action requested, if any.
    #[must_use]
    pub const fn config_action(&self) -> Option<ConfigAction> {
        let config = &self.config;

        if config.config_show {
            Some(ConfigAction::Show)
        } else if config.config_init {
            Some(ConfigAction::Init)
        } else if config.config_path {
            Some(ConfigAction::Path)
        } else {
            None
        }
    }

    /// Whether `--edit` was requested.
    #[must_use]
    pub const fn edit(&self) -> bool {
        self.display.edit
    }

    /// Resolve the root to scan.
    ///
    /// Priority: positional argument > `--dir` > config file `dir` > `.`.
    /// Tilde expansion is applied to the config file value.
    #[must_use]
    pub fn root(&self, config: &FileConfig) -> PathBuf {
        self.dir
            .clone()
            .or_else(|| self.dir_flag.clone())
            .or_else(|| config.dir.as_deref().map(expand_tilde))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Build the (unresolved) traversal configuration.
    ///
    /// Exclusions are merged from the config file and the command line.
    #[must_use]
    pub fn traversal_config(&self, config: &FileConfig) -> TraversalConfig {
        let scan = &self.scanning;
        let file = &config.scanning;

        let mut traversal = TraversalConfig::new(self.root(config));
        traversal
            .exclude
            .extend(file.exclude.iter().flatten().cloned());
        traversal.exclude.extend(scan.exclude.iter().cloned());
        traversal.squash_hardlinks = flag_pair(
            scan.squash_hardlinks,
            scan.no_squash_hardlinks,
            file.squash_hardlinks,
            true,
        );
        traversal.one_file_system = flag_pair(
            scan.one_file_system,
            scan.no_one_file_system,
            file.one_file_system,
            true,
        );
        traversal.max_depth = self.max_depth(config);
        traversal.verbose = scan.verbose || file.verbose.unwrap_or(false);

        traversal
    }

    /// Build the display options.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file names an unknown unit.
    pub fn display_options(&self, config: &FileConfig) -> Result<DisplayOptions> {
        let disp = &self.display;
        let file = &config.display;

        let unit = match (self.unit(), file.unit.as_deref()) {
            (Some(unit), _) => unit,
            (None, Some(name)) => Unit::from_str(name, true)
                .map_err(|_| anyhow!("Unknown unit in config file: \"{name}\""))?,
            (None, None) => Unit::default(),
        };

        Ok(DisplayOptions {
            unit,
            commify: flag_pair(disp.commify, disp.no_commify, file.commify, false),
            max_depth: self.max_depth(config),
            absolute: flag_pair(disp.absolute, disp.no_absolute, file.absolute, false),
            vim: disp.vim || file.vim.unwrap_or(false),
        })
    }

    /// Unit selected on the command line, if any.
    const fn unit(&self) -> Option<Unit> {
        let disp = &self.display;

        if disp.bytes {
            Some(Unit::Bytes)
        } else if disp.kilobytes {
            Some(Unit::Kilobytes)
        } else if disp.megabytes {
            Some(Unit::Megabytes)
        } else if disp.gigabytes {
            Some(Unit::Gigabytes)
        } else if disp.human {
            Some(Unit::Human)
        } else {
            None
        }
    }

    fn max_depth(&self, config: &FileConfig) -> Option<usize> {
        self.scanning.max_depth.or(config.scanning.max_depth)
    }
}
