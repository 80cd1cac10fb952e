//! Output configuration for diagnostics.
//!
//! [`DiagConfig`] is shared by every diagnostic registered from it;
//! [`validate()`](DiagConfig::validate) checks its invariants before any
//! file is touched.

use std::path::{Path, PathBuf};

use crate::error::DiagError;
use crate::schedule::Schedule;

/// Default directory for diagnostic files.
pub const DEFAULT_OUTPUT_DIR: &str = "./diags/reducedfiles";
/// Default file extension (without the dot).
pub const DEFAULT_EXTENSION: &str = "txt";
/// Default column separator.
pub const DEFAULT_SEPARATOR: &str = " ";
/// Largest accepted fixed precision. 17 significant digits already
/// round-trip every `f64`.
pub const MAX_PRECISION: usize = 17;

// ── DiagConfig ─────────────────────────────────────────────────────

/// Where and how a diagnostic writes its file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagConfig {
    /// Directory holding the diagnostic files. Created on demand.
    pub output_dir: PathBuf,
    /// File extension, without the leading dot. Default: `txt`.
    pub extension: String,
    /// Column separator used for both header and data rows. Default: `" "`.
    pub separator: String,
    /// Whether the designated writer truncates the file and writes the
    /// header at construction. Default: `true`.
    pub write_header: bool,
    /// Fractional digits in scientific notation, or `None` for the
    /// shortest round-trip representation. Default: `None`.
    pub precision: Option<usize>,
    /// Steps at which the diagnostic is consulted. Default: every step.
    pub schedule: Schedule,
}

impl Default for DiagConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            write_header: true,
            precision: None,
            schedule: Schedule::Always,
        }
    }
}

impl DiagConfig {
    /// Default configuration writing into `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), DiagError> {
        let invalid = |reason: &str| DiagError::InvalidConfig {
            reason: reason.to_string(),
        };
        if self.extension.is_empty() {
            return Err(invalid("extension must not be empty"));
        }
        if self.extension.starts_with('.') {
            return Err(invalid("extension must not start with '.'"));
        }
        if self.extension.contains(['/', '\\']) {
            return Err(invalid("extension must not contain path separators"));
        }
        if self.separator.is_empty() {
            return Err(invalid("separator must not be empty"));
        }
        if self.separator.contains(['\n', '\r', '#']) {
            return Err(invalid("separator must not contain newlines or '#'"));
        }
        if let Some(p) = self.precision {
            if p > MAX_PRECISION {
                return Err(DiagError::InvalidConfig {
                    reason: format!("precision {p} exceeds maximum of {MAX_PRECISION}"),
                });
            }
        }
        Ok(())
    }

    /// Path of the file backing diagnostic `name`.
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.{}", self.extension))
    }
}
