//! Handing the report to an external editor.
//!
//! In edit mode the report is written to a temporary file which is then
//! opened with the program named by `$EDITOR`. The file is removed once the
//! editor exits.

use std::{env, process::Command};

use anyhow::{Context, Result, bail};

use crate::output::Report;

/// An editor command line, e.g. `vim` or `code --wait`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    command: String,
}

impl Editor {
    /// Read the editor from the `EDITOR` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if `EDITOR` is unset or blank.
    pub fn from_env() -> Result<Self> {
        let command = env::var("EDITOR").unwrap_or_default();
        Self::from_command(&command)
            .context("--edit requires the EDITOR environment variable to be set")
    }

    /// Use an explicit command line.
    ///
    /// # Errors
    ///
    /// Returns an error if `command` contains no program name.
    pub fn from_command(command: &str) -> Result<Self> {
        if command.trim().is_empty() {
            bail!("Editor command is empty");
        }

        Ok(Self {
            command: command.trim().to_string(),
        })
    }

    /// The command line as configured.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Write `report` to a temporary file and open it in the editor.
    ///
    /// Blocks until the editor exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be written, the editor
    /// cannot be started, or it exits unsuccessfully.
    pub fn open_report(&self, report: Report) -> Result<()> {
        let mut file = tempfile::Builder::new()
            .prefix("sizes-")
            .suffix(".txt")
            .tempfile()
            .context("Failed to create temporary report file")?;

        report
            .write_to(&mut file)
            .with_context(|| format!("Failed to write report to {}", file.path().display()))?;

        let mut words = self.command.split_whitespace();
        let Some(program) = words.next() else {
            bail!("Editor command is empty");
        };

        let status = Command::new(program)
            .args(words)
            .arg(file.path())
            .status()
            .with_context(|| format!("Failed to start editor `{}`", self.command))?;

        if !status.success() {
            bail!("Editor `{}` exited with {status}", self.command);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DisplayOptions, tree::SizeTree};
    use std::path::PathBuf;

    fn report() -> Report {
        let mut tree = SizeTree::new();
        tree.record(&["a"], 10);
        Report::new(tree.into_root(), PathBuf::from("."), DisplayOptions::default())
    }

    #[test]
    fn test_from_command_rejects_blank() {
        assert!(Editor::from_command("").is_err());
        assert!(Editor::from_command("   ").is_err());
    }

    #[test]
    fn test_from_command_trims() {
        let editor = Editor::from_command("  code --wait ").unwrap();
        assert_eq!(editor.command(), "code --wait");
    }

    #[cfg(unix)]
    #[test]
    fn test_open_report_with_successful_editor() {
        let editor = Editor::from_command("true").unwrap();
        assert!(editor.open_report(report()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_open_report_with_failing_editor() {
        let editor = Editor::from_command("false").unwrap();
        let err = editor.open_report(report()).unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }

    #[test]
    fn test_open_report_with_missing_editor() {
        let editor = Editor::from_command("sizes-no-such-editor-binary").unwrap();
        let err = editor.open_report(report()).unwrap_err();
        assert!(err.to_string().contains("Failed to start editor"));
    }
}
