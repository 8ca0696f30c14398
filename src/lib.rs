//! # sizes
//!
//! Recursive disk usage aggregation and hierarchical reporting.
//!
//! A scan walks a directory tree depth-first, filters each entry (excluded
//! names, other devices, hard links already counted) and adds the surviving
//! sizes to every ancestor in a [`tree::SizeTree`]. The finished tree is
//! rendered by [`output::Report`] as an indented, size-sorted listing.
//!
//! ```no_run
//! use std::path::PathBuf;
//! use sizes::{DisplayOptions, TraversalConfig, output::Report, scanner::Scanner};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = TraversalConfig::new(".").resolve()?;
//! let result = Scanner::new(config).scan();
//!
//! let report = Report::new(result.tree.into_root(), PathBuf::from("."), DisplayOptions::default());
//! for line in report {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod editor;
pub mod filtering;
pub mod output;
pub mod scanner;
pub mod tree;
pub mod utils;

pub use config::{DisplayOptions, TraversalConfig, Unit};
