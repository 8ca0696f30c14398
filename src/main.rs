//! # sizes
//!
//! Show where disk space goes: a recursive, size-sorted view of a directory
//! tree.
//!
//! Every file's size is added to each of its ancestors, hard links are
//! counted once, and other mounted filesystems are left alone by default.
//! The result is printed as an indented tree, largest entries first.
//!
//! ## Usage
//!
//! ```bash
//! # Current directory, human-readable units
//! sizes
//!
//! # Two levels deep, ignoring VCS and dependency folders
//! sizes ~/src --max-depth 2 --exclude .git --exclude node_modules
//!
//! # Exact byte counts with thousands separators, opened in $EDITOR
//! sizes -b --commify --vim --edit
//! ```

mod cli;

use std::{
    fs,
    io::{self, IsTerminal},
    path::PathBuf,
    process::exit,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, ConfigAction};
use colored::Colorize;
use humansize::{DECIMAL, format_size};
use sizes::{
    config::FileConfig,
    editor::Editor,
    output::Report,
    scanner::{ScanStats, Scanner},
};

/// Entry point for the sizes application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and printing
/// any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// All configuration problems (unknown unit, missing `EDITOR`, missing root)
/// are reported before the walk starts, so a failed run prints no report.
///
/// # Errors
///
/// Returns configuration errors, and I/O errors while writing the report.
fn inner_main() -> Result<()> {
    let args = Cli::parse();

    if let Some(action) = args.config_action() {
        return run_config_action(action);
    }

    let file_config = load_config();
    let display = args.display_options(&file_config)?;

    let editor = if args.edit() {
        Some(Editor::from_env()?)
    } else {
        None
    };

    let traversal = args.traversal_config(&file_config).resolve()?;

    let root_path = if display.absolute {
        fs::canonicalize(&traversal.root)
            .with_context(|| format!("Failed to resolve {}", traversal.root.display()))?
    } else {
        traversal.root.clone()
    };

    let scanner = Scanner::new(traversal).with_progress(io::stderr().is_terminal());
    let result = scanner.scan();

    if scanner.config().verbose {
        print_scan_summary(&result.stats, result.tree.total_bytes());
    }

    let report = Report::new(result.tree.into_root(), root_path, display);

    match editor {
        Some(editor) => editor.open_report(report),
        None => write_stdout(report),
    }
}

/// Print the report to stdout, treating a closed pipe as success.
fn write_stdout(report: Report) -> Result<()> {
    match report.write_to(&mut io::stdout().lock()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("Failed to write report"),
    }
}

/// One-line summary of a scan on stderr.
fn print_scan_summary(stats: &ScanStats, total: u64) {
    eprintln!(
        "{} {} entries ({} excluded, {} pruned, {} hard links squashed, {} unreadable), {} total",
        "Scanned".bold(),
        stats.recorded,
        stats.excluded,
        stats.pruned,
        stats.deduplicated,
        stats.unreadable,
        format_size(total, DECIMAL).bright_white()
    );
}

// ── Config file actions ───────────────────────────────────────────────

/// Default config file template written by `--config-init`.
const CONFIG_TEMPLATE: &str = r#"# sizes configuration
# All values shown are their defaults. Uncomment and change as needed.

# Default directory to scan (defaults to current directory when not set)
# dir = "."

[scanning]
# Entry names to skip at any depth
# exclude = []

# Count a hard-linked file only once
# squash_hardlinks = true

# Do not cross into other mounted filesystems
# one_file_system = true

# Fold entries deeper than this into their ancestor (unset = unlimited)
# max_depth = 3

# Report unreadable entries and print a scan summary
# verbose = false

[display]
# Unit for sizes: bytes, kilobytes, megabytes, gigabytes, human
# unit = "human"

# Insert thousands separators
# commify = false

# Print full paths, indented from the filesystem root
# absolute = false

# Append a vim fold modeline
# vim = false
"#;

/// Run a `--config-*` action instead of scanning.
fn run_config_action(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => println!("{}", config_file_path()?.display()),
        ConfigAction::Show => show_config()?,
        ConfigAction::Init => init_config()?,
    }
    Ok(())
}

fn config_file_path() -> Result<PathBuf> {
    FileConfig::config_path().context("No config directory is known for this platform")
}

/// Print the settings a plain `sizes` run would use.
fn show_config() -> Result<()> {
    let path = config_file_path()?;

    let config = if path.is_file() {
        println!("# {}", path.display());
        FileConfig::load_from(&path)?
    } else {
        println!("# {} does not exist, built-in defaults apply", path.display());
        FileConfig::default()
    };

    println!("{}", format_config(&config));
    Ok(())
}

/// Format a [`FileConfig`] as a human-readable table, showing defaults for `None` fields.
fn format_config(config: &FileConfig) -> String {
    fn show_bool(val: Option<bool>, default: bool) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }

    let dir = config.dir.as_ref().map_or_else(
        || "\".\"  (default)".to_string(),
        |p| format!("\"{}\"", p.display()),
    );
    let exclude = match config.scanning.exclude.as_deref() {
        Some(v) if !v.is_empty() => {
            let items: Vec<String> = v.iter().map(|s| format!("\"{s}\"")).collect();
            format!("[{}]", items.join(", "))
        }
        _ => "[]  (default)".to_string(),
    };
    let max_depth = config
        .scanning
        .max_depth
        .map_or_else(|| "unlimited  (default)".to_string(), |d| d.to_string());
    let unit = config
        .display
        .unit
        .as_deref()
        .map_or_else(|| "\"human\"  (default)".to_string(), |u| format!("\"{u}\""));

    format!(
        "\
dir              = {dir}

[scanning]
exclude          = {exclude}
squash_hardlinks = {squash_hardlinks}
one_file_system  = {one_file_system}
max_depth        = {max_depth}
verbose          = {verbose}

[display]
unit             = {unit}
commify          = {commify}
absolute         = {absolute}
vim              = {vim}",
        squash_hardlinks = show_bool(config.scanning.squash_hardlinks, true),
        one_file_system = show_bool(config.scanning.one_file_system, true),
        verbose = show_bool(config.scanning.verbose, false),
        commify = show_bool(config.display.commify, false),
        absolute = show_bool(config.display.absolute, false),
        vim = show_bool(config.display.vim, false),
    )
}

/// Write [`CONFIG_TEMPLATE`], leaving an existing file untouched.
fn init_config() -> Result<()> {
    let path = config_file_path()?;

    if path.exists() {
        eprintln!(
            "{} {} already exists, not overwriting it",
            "Warning:".yellow(),
            path.display()
        );
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    fs::write(&path, CONFIG_TEMPLATE)
        .with_context(|| format!("Cannot write {}", path.display()))?;

    println!("{}", path.display());
    Ok(())
}

/// Load the configuration file, falling back to defaults on failure.
fn load_config() -> FileConfig {
    match FileConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
            FileConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_template_parses_to_defaults() {
        let config: FileConfig = toml::from_str(CONFIG_TEMPLATE).unwrap();

        assert!(config.dir.is_none());
        assert!(config.scanning.exclude.is_none());
        assert!(config.display.unit.is_none());
    }

    #[test]
    fn test_format_config_shows_defaults() {
        let text = format_config(&FileConfig::default());

        assert!(text.contains("squash_hardlinks = true  (default)"));
        assert!(text.contains("max_depth        = unlimited  (default)"));
        assert!(text.contains("unit             = \"human\"  (default)"));
    }
}
