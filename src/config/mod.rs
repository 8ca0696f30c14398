//! Configuration for traversal and report display.
//!
//! Options are resolved once, before the walk starts, from CLI arguments
//! layered over the optional config file.

pub mod display;
pub mod file;
pub mod scan;

pub use display::{DisplayOptions, Unit};
pub use file::FileConfig;
pub use scan::TraversalConfig;
