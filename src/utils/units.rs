//! Byte-count scaling for report output.
//!
//! This module turns raw byte totals into the short strings shown in the
//! report. Two modes exist:
//!
//! - **Human**: a suffix (`k`, `m`, `g`, `t`, `p`) is chosen per value using
//!   decimal (power of ten) scales.
//! - **Fixed**: every value is divided by the same unit and truncated.
//!
//! Thousands separators can be applied on top of either mode.

use crate::config::Unit;

/// Decimal scales tried in human mode, largest first.
///
/// There is no byte entry: a value no scale accepts prints as a plain integer.
const HUMAN_SCALES: [(u64, &str); 5] = [
    (1_000_000_000_000_000, "p"),
    (1_000_000_000_000, "t"),
    (1_000_000_000, "g"),
    (1_000_000, "m"),
    (1_000, "k"),
];

/// Format a byte count for display in the given unit.
///
/// # Arguments
///
/// * `bytes` - The raw byte count
/// * `unit` - Fixed unit to divide by, or [`Unit::Human`] for automatic scaling
/// * `commify` - Whether to insert thousands separators into the integer part
///
/// # Examples
///
/// ```
/// # use sizes::config::Unit;
/// # use sizes::utils::format_bytes;
/// assert_eq!(format_bytes(9_500_000_000, Unit::Human, false), "9.5g");
/// assert_eq!(format_bytes(1_234_567, Unit::Bytes, true), "1,234,567");
/// assert_eq!(format_bytes(999, Unit::Kilobytes, false), "0.00k");
/// ```
#[must_use]
pub fn format_bytes(bytes: u64, unit: Unit, commify: bool) -> String {
    let scaled = match unit {
        Unit::Human => scale_human(bytes),
        fixed => scale_fixed(bytes, fixed),
    };

    if commify {
        insert_separators(&scaled)
    } else {
        scaled
    }
}

/// Pick a suffix automatically.
///
/// Scales are tried from largest to smallest. The first scale where the value
/// exceeds 9 is printed with one decimal; otherwise the first scale where it
/// exceeds 0.9 is printed with two decimals. Anything below 1k stays a plain
/// integer, so `105` is never shown as `0.1k`.
#[allow(clippy::cast_precision_loss)]
fn scale_human(bytes: u64) -> String {
    for (scale, suffix) in HUMAN_SCALES {
        let value = bytes as f64 / scale as f64;

        if value > 9.0 {
            return format!("{value:.1}{suffix}");
        }
        if value > 0.9 {
            return format!("{value:.2}{suffix}");
        }
    }

    bytes.to_string()
}

/// Divide by a fixed unit and truncate.
///
/// A value that truncates to zero in a unit larger than a byte is written
/// with two decimals (`0.00k`) so it does not read as an empty entry.
fn scale_fixed(bytes: u64, unit: Unit) -> String {
    let divisor = unit.divisor();
    let whole = bytes / divisor;

    if whole == 0 && divisor > 1 {
        format!("{whole}.00{}", unit.suffix())
    } else {
        format!("{whole}{}", unit.suffix())
    }
}

/// Insert `,` every three digits into the leading integer part of `value`.
///
/// Everything after the first non-digit character (decimal point, unit
/// suffix) is left untouched.
///
/// # Examples
///
/// ```
/// # use sizes::utils::insert_separators;
/// assert_eq!(insert_separators("1234567"), "1,234,567");
/// assert_eq!(insert_separators("1234.56k"), "1,234.56k");
/// ```
#[must_use]
pub fn insert_separators(value: &str) -> String {
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, rest) = value.split_at(split);

    let mut out = String::with_capacity(value.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push_str(rest);

    out
}
