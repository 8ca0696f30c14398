//! Utility functions and helpers.
//!
//! This module contains utility functions used throughout the application,
//! such as scaling byte counts for display.

pub mod units;

pub use units::{format_bytes, insert_separators};
