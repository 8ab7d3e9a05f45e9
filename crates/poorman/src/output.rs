//! Writing and formatting generated files.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{GenerateError, Result};

/// Persists rendered text.
pub trait OutputWriter {
    /// Writes `text` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Write`] if the file cannot be written.
    fn write(&self, path: &Path, text: &str) -> Result<()>;
}

/// Writes files to disk, creating parent directories as needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsWriter;

impl OutputWriter for FsWriter {
    fn write(&self, path: &Path, text: &str) -> Result<()> {
        let write_error = |source| GenerateError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, text).map_err(write_error)?;
        debug!(path = %path.display(), bytes = text.len(), "Wrote file");
        Ok(())
    }
}

/// Post-processes a written file in place.
pub trait CodeFormatter {
    /// Formats the file at `path`.
    ///
    /// Failures are reported to the caller as a message; they never undo
    /// the write.
    ///
    /// # Errors
    ///
    /// Returns a description of why formatting failed.
    fn format(&self, path: &Path) -> std::result::Result<(), String>;
}

/// Runs an external formatter as `<program> -w <file>` (`goimports`,
/// `gofmt`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFormatter {
    program: String,
}

impl CommandFormatter {
    /// Creates a formatter running the given program.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the formatter program.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandFormatter {
    fn default() -> Self {
        Self::new("goimports")
    }
}

impl CodeFormatter for CommandFormatter {
    fn format(&self, path: &Path) -> std::result::Result<(), String> {
        let output = Command::new(&self.program)
            .arg("-w")
            .arg(path)
            .output()
            .map_err(|e| format!("failed to run {}: {e}", self.program))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))
        }
    }
}
