//! Display configuration for the rendered report.
//!
//! This module defines the unit used to print sizes and the options that
//! control how the aggregated tree is laid out.

use clap::ValueEnum;

/// Unit used to print every size in the report.
///
/// All fixed units are decimal (powers of 1000). [`Unit::Human`] picks a
/// suffix per value instead of using one unit for the whole report.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum, Default)]
pub enum Unit {
    /// Plain byte counts
    Bytes,

    /// Thousands of bytes (`k`)
    Kilobytes,

    /// Millions of bytes (`m`)
    Megabytes,

    /// Billions of bytes (`g`)
    Gigabytes,

    /// Automatic suffix per value
    #[default]
    Human,
}

impl Unit {
    /// Divisor applied in fixed-unit mode.
    ///
    /// [`Unit::Human`] has no single divisor and reports `1`.
    #[must_use]
    pub const fn divisor(self) -> u64 {
        match self {
            Self::Bytes | Self::Human => 1,
            Self::Kilobytes => 1_000,
            Self::Megabytes => 1_000_000,
            Self::Gigabytes => 1_000_000_000,
        }
    }

    /// Suffix appended to values printed in this unit.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Bytes | Self::Human => "",
            Self::Kilobytes => "k",
            Self::Megabytes => "m",
            Self::Gigabytes => "g",
        }
    }
}

/// Options controlling how the report is rendered.
#[derive(Clone, Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct DisplayOptions {
    /// Unit for every printed size
    pub unit: Unit,

    /// Insert thousands separators into the integer part
    pub commify: bool,

    /// Hide nodes deeper than this below the root (None = show everything)
    pub max_depth: Option<usize>,

    /// Label lines with full paths and indent from the filesystem root
    pub absolute: bool,

    /// Append a vim fold modeline after the report
    pub vim: bool,
}
