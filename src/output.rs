//! Rendering of the aggregated tree as an indented text report.
//!
//! Lines are produced lazily by [`ReportLines`], which consumes the tree as
//! it goes. Siblings are ordered by descending size, then shorter name, then
//! name, so repeated runs over the same tree print identical output.

use std::{
    cmp::Ordering,
    io::{self, Write},
    path::{Component, Path, PathBuf},
};

use crate::{config::DisplayOptions, tree::SizeNode, utils::format_bytes};

/// Trailing line emitted with `--vim` so the report folds by indentation.
pub const VIM_MODELINE: &str = "# vim: set foldmethod=indent shiftwidth=2 foldlevel=1 :";

/// Width the size column is right-aligned to.
const SIZE_WIDTH: usize = 6;

/// A finished scan ready to be printed.
#[derive(Debug)]
pub struct Report {
    root: SizeNode,
    root_path: PathBuf,
    options: DisplayOptions,
}

impl Report {
    /// Create a report for `root`, which was scanned from `root_path`.
    ///
    /// In absolute mode `root_path` should already be canonical; it is used
    /// verbatim for labels and indentation.
    #[must_use]
    pub const fn new(root: SizeNode, root_path: PathBuf, options: DisplayOptions) -> Self {
        Self {
            root,
            root_path,
            options,
        }
    }

    /// Consume the report, producing its lines in display order.
    #[must_use]
    pub fn lines(self) -> ReportLines {
        let base_depth = if self.options.absolute {
            path_depth(&self.root_path)
        } else {
            0
        };

        ReportLines {
            stack: vec![Pending {
                depth: 0,
                name: String::new(),
                path: self.root_path.clone(),
                node: self.root,
            }],
            trailer: self.options.vim,
            root_path: self.root_path,
            base_depth,
            options: self.options,
        }
    }

    /// Write every line, newline-terminated, to `out`.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write>(self, out: &mut W) -> io::Result<()> {
        for line in self.lines() {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }
}

impl IntoIterator for Report {
    type Item = String;
    type IntoIter = ReportLines;

    fn into_iter(self) -> Self::IntoIter {
        self.lines()
    }
}

/// Lazy, single-pass iterator over report lines.
#[derive(Debug)]
pub struct ReportLines {
    stack: Vec<Pending>,
    trailer: bool,
    root_path: PathBuf,
    base_depth: usize,
    options: DisplayOptions,
}

/// A node waiting to be printed.
#[derive(Debug)]
struct Pending {
    depth: usize,
    name: String,
    path: PathBuf,
    node: SizeNode,
}

impl Iterator for ReportLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let Some(Pending {
            depth,
            name,
            path,
            node,
        }) = self.stack.pop()
        else {
            if self.trailer {
                self.trailer = false;
                return Some(VIM_MODELINE.to_string());
            }
            return None;
        };

        if self.options.max_depth.is_none_or(|max| depth < max) {
            let mut children: Vec<(String, SizeNode)> = node.children.into_iter().collect();
            children.sort_by(|(a_name, a), (b_name, b)| compare_entries(a_name, a, b_name, b));

            // Reversed so the first child is popped first.
            for (child_name, child) in children.into_iter().rev() {
                self.stack.push(Pending {
                    depth: depth + 1,
                    path: path.join(&child_name),
                    name: child_name,
                    node: child,
                });
            }
        }

        let label = if self.options.absolute {
            path.display().to_string()
        } else if depth == 0 {
            self.root_path.display().to_string()
        } else {
            name
        };

        let indent = "  ".repeat(self.base_depth + depth);
        let size = format_bytes(node.total_bytes, self.options.unit, self.options.commify);

        Some(format!("{indent}{size:>SIZE_WIDTH$} {label}"))
    }
}

/// Sibling order: larger total first, then shorter name, then name.
fn compare_entries(a_name: &str, a: &SizeNode, b_name: &str, b: &SizeNode) -> Ordering {
    b.total_bytes
        .cmp(&a.total_bytes)
        .then_with(|| a_name.chars().count().cmp(&b_name.chars().count()))
        .then_with(|| a_name.cmp(b_name))
}

/// Number of named components between the filesystem root and `path`.
fn path_depth(path: &Path) -> usize {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Unit, tree::SizeTree};

    fn scenario_a() -> SizeNode {
        let mut tree = SizeTree::new();
        tree.record(&["a"], 100);
        tree.record(&["b", "c"], 200);
        tree.record(&["b", "d"], 9_500_000_000);
        tree.into_root()
    }

    fn render(root: SizeNode, options: DisplayOptions) -> Vec<String> {
        Report::new(root, PathBuf::from("top"), options)
            .lines()
            .collect()
    }

    #[test]
    fn test_scenario_a_human() {
        let lines = render(scenario_a(), DisplayOptions::default());

        assert_eq!(
            lines,
            vec![
                "  9.5g top",
                "    9.5g b",
                "      9.5g d",
                "       200 c",
                "     100 a",
            ]
        );
    }

    #[test]
    fn test_tie_break_shorter_then_lexicographic() {
        let mut tree = SizeTree::new();
        tree.record(&["bbb"], 10);
        tree.record(&["aa"], 10);
        tree.record(&["ab"], 10);
        tree.record(&["z"], 10);
        tree.record(&["big"], 11);

        let names: Vec<String> = render(tree.into_root(), DisplayOptions::default())
            .into_iter()
            .skip(1)
            .map(|line| line.rsplit(' ').next().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["big", "z", "aa", "ab", "bbb"]);
    }

    #[test]
    fn test_max_depth_zero_shows_only_root() {
        let options = DisplayOptions {
            max_depth: Some(0),
            ..DisplayOptions::default()
        };

        assert_eq!(render(scenario_a(), options), vec!["  9.5g top"]);
    }

    #[test]
    fn test_max_depth_truncates_display() {
        let options = DisplayOptions {
            max_depth: Some(1),
            ..DisplayOptions::default()
        };

        let lines = render(scenario_a(), options);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| !l.ends_with(" d") && !l.ends_with(" c")));
    }

    #[test]
    fn test_bytes_commify() {
        let mut tree = SizeTree::new();
        tree.record(&["file"], 1_234_567);
        let options = DisplayOptions {
            unit: Unit::Bytes,
            commify: true,
            ..DisplayOptions::default()
        };

        let lines = render(tree.into_root(), options);
        assert_eq!(lines[1], "  1,234,567 file");
    }

    #[test]
    fn test_kilobytes_below_one_unit() {
        let mut tree = SizeTree::new();
        tree.record(&["small"], 999);
        let options = DisplayOptions {
            unit: Unit::Kilobytes,
            ..DisplayOptions::default()
        };

        let lines = render(tree.into_root(), options);
        assert_eq!(lines[1], "   0.00k small");
    }

    #[test]
    fn test_absolute_labels_and_indent() {
        let mut tree = SizeTree::new();
        tree.record(&["f"], 5);
        let options = DisplayOptions {
            absolute: true,
            ..DisplayOptions::default()
        };

        let lines: Vec<String> = Report::new(tree.into_root(), PathBuf::from("/srv/data"), options)
            .lines()
            .collect();

        assert_eq!(lines[0], format!("    {:>6} /srv/data", "5"));
        assert_eq!(
            lines[1],
            format!("      {:>6} {}", "5", Path::new("/srv/data").join("f").display())
        );
    }

    #[test]
    fn test_vim_trailer() {
        let options = DisplayOptions {
            vim: true,
            ..DisplayOptions::default()
        };

        let lines = render(scenario_a(), options);
        assert_eq!(lines.last().map(String::as_str), Some(VIM_MODELINE));
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let first = render(scenario_a(), DisplayOptions::default());
        let second = render(scenario_a(), DisplayOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_to_buffer() {
        let mut buf = Vec::new();
        Report::new(scenario_a(), PathBuf::from("top"), DisplayOptions::default())
            .write_to(&mut buf)
            .unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_path_depth() {
        assert_eq!(path_depth(Path::new("/")), 0);
        assert_eq!(path_depth(Path::new("/srv/data")), 2);
    }
}
