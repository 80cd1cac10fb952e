//! Append-only file sink for diagnostic rows.
//!
//! [`AppendingFileWriter`] never holds a file handle between calls: each
//! write opens the file, writes one complete line with a single
//! `write_all`, and closes it again. A crash between steps therefore
//! cannot leave a dangling handle or a half-written row behind.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::DiagError;

/// Writes header and data lines to one diagnostic file.
#[derive(Clone, Debug)]
pub struct AppendingFileWriter {
    path: PathBuf,
}

impl AppendingFileWriter {
    /// Create a writer targeting `path`. Touches nothing on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate (or create) the file and write `header` as its only line.
    ///
    /// Missing parent directories are created.
    pub fn create_with_header(&self, header: &str) -> Result<(), DiagError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| DiagError::io(parent, e))?;
        }
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| DiagError::io(&self.path, e))?;
        file.write_all(with_newline(header).as_bytes())
            .map_err(|e| DiagError::io(&self.path, e))
    }

    /// Append `line` to the file, creating it if absent.
    pub fn append_line(&self, line: &str) -> Result<(), DiagError> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| DiagError::io(&self.path, e))?;
        file.write_all(with_newline(line).as_bytes())
            .map_err(|e| DiagError::io(&self.path, e))
    }
}

fn with_newline(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 1);
    out.push_str(line);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_test_utils::ScratchDir;

    #[test]
    fn header_truncates_previous_contents() {
        let dir = ScratchDir::new();
        let w = AppendingFileWriter::new(dir.join("d.txt"));
        w.create_with_header("#old").unwrap();
        w.append_line("1 2 3").unwrap();
        w.create_with_header("#new").unwrap();
        assert_eq!(dir.read("d.txt").unwrap(), "#new\n");
    }

    #[test]
    fn append_creates_missing_file() {
        let dir = ScratchDir::new();
        let w = AppendingFileWriter::new(dir.join("fresh.txt"));
        w.append_line("0 0 1").unwrap();
        w.append_line("1 0 2").unwrap();
        assert_eq!(dir.read("fresh.txt").unwrap(), "0 0 1\n1 0 2\n");
    }

    #[test]
    fn header_creates_nested_directories() {
        let dir = ScratchDir::new();
        let w = AppendingFileWriter::new(dir.join("a/b/c.txt"));
        w.create_with_header("#h").unwrap();
        assert_eq!(dir.read("a/b/c.txt").unwrap(), "#h\n");
    }

    #[test]
    fn unwritable_target_reports_path() {
        let dir = ScratchDir::new();
        // A directory where the file should be makes the open fail.
        std::fs::create_dir(dir.join("taken.txt")).unwrap();
        let w = AppendingFileWriter::new(dir.join("taken.txt"));
        let err = w.create_with_header("#h").unwrap_err();
        match err {
            DiagError::Io { path, .. } => assert_eq!(path, dir.join("taken.txt")),
            other => panic!("expected Io, got {other:?}"),
        }
    }
}
