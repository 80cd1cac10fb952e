//! Error types for diagnostic construction, computation and I/O.

use std::fmt;
use std::io;
use std::path::PathBuf;

use tally_core::ContextError;
use thiserror::Error;

/// Errors raised by the diagnostics subsystem.
#[derive(Debug, Error)]
pub enum DiagError {
    /// Opening or writing a diagnostic file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file being created or appended to.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A simulation query failed while computing a diagnostic.
    #[error("diagnostic '{name}': {source}")]
    Context {
        /// Name of the diagnostic that issued the query.
        name: String,
        /// The underlying query failure.
        #[source]
        source: ContextError,
    },
    /// A [`DiagConfig`](crate::DiagConfig) invariant was violated.
    #[error("invalid diagnostic config: {reason}")]
    InvalidConfig {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// The diagnostic name cannot be used as a file stem.
    #[error("invalid diagnostic name '{name}': {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// A diagnostic with this name is already registered.
    #[error("diagnostic '{name}' is already registered")]
    DuplicateName {
        /// The duplicated name.
        name: String,
    },
    /// The diagnostic kind string is not recognized.
    #[error("unknown diagnostic kind '{value}'")]
    UnknownKind {
        /// The unrecognized string.
        value: String,
    },
    /// A schedule string could not be parsed.
    #[error("invalid schedule '{input}': {reason}")]
    InvalidSchedule {
        /// The offending schedule text.
        input: String,
        /// Description of the parse failure.
        reason: String,
    },
    /// A diagnostic file could not be parsed back.
    #[error("malformed diagnostic file at line {line}: {reason}")]
    MalformedFile {
        /// 1-based line number.
        line: usize,
        /// Description of the parse failure.
        reason: String,
    },
}

impl DiagError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this is an I/O failure (deferred by
    /// [`DiagnosticSet`](crate::DiagnosticSet) rather than returned).
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// I/O failures collected across steps, reported at a sync point.
///
/// Each entry pairs the diagnostic name with the error that disabled it.
#[derive(Debug, Default)]
pub struct DeferredIoErrors {
    /// `(diagnostic name, error)` in the order failures occurred.
    pub failures: Vec<(String, DiagError)>,
}

impl DeferredIoErrors {
    /// Whether no failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.failures.len()
    }
}

impl fmt::Display for DeferredIoErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} diagnostic(s) disabled after I/O failure", self.failures.len())?;
        for (name, err) in &self.failures {
            write!(f, "; {name}: {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DeferredIoErrors {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|(_, e)| e as &(dyn std::error::Error + 'static))
    }
}
