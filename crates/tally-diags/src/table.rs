//! Reading diagnostic files back.
//!
//! [`DiagTable`] parses the header and every data row of a file produced
//! by a [`DiagnosticRecord`](crate::DiagnosticRecord). It performs no
//! analysis; it only restores the typed rows.

use std::path::Path;

use tally_core::{Scalar, StepIndex};

use crate::error::DiagError;
use crate::format::LEADING_COLUMNS;

/// One data row.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagRow {
    /// Step the row was recorded at.
    pub step: StepIndex,
    /// Simulation time of that step.
    pub time: Scalar,
    /// Buffer values, one per diagnostic column.
    pub values: Vec<Scalar>,
}

/// A parsed diagnostic file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiagTable {
    /// Column labels with the `[i]` prefix stripped, step and time included.
    /// Empty if the file had no header.
    pub columns: Vec<String>,
    /// Data rows in file order.
    pub rows: Vec<DiagRow>,
}

impl DiagTable {
    /// Read and parse the file at `path`.
    pub fn read(path: impl AsRef<Path>, sep: &str) -> Result<Self, DiagError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| DiagError::io(path, e))?;
        Self::parse(&text, sep)
    }

    /// Parse file contents split on `sep`.
    ///
    /// ```
    /// use tally_diags::DiagTable;
    ///
    /// let t = DiagTable::parse("#[0]step() [1]time(s) [2]residual\n3 0.5 1e-9\n", " ").unwrap();
    /// assert_eq!(t.columns, ["step()", "time(s)", "residual"]);
    /// assert_eq!(t.rows[0].values, [1e-9]);
    /// ```
    pub fn parse(text: &str, sep: &str) -> Result<Self, DiagError> {
        let mut table = Self::default();
        for (idx, line) in text.lines().enumerate() {
            let lineno = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            if let Some(header) = line.strip_prefix('#') {
                if !table.columns.is_empty() || !table.rows.is_empty() {
                    return Err(malformed(lineno, "header after first line"));
                }
                table.columns = header
                    .split(sep)
                    .map(|c| strip_index(c).to_string())
                    .collect();
                continue;
            }
            let row = parse_row(line, sep, lineno)?;
            let width = LEADING_COLUMNS + row.values.len();
            if !table.columns.is_empty() && width != table.columns.len() {
                return Err(malformed(
                    lineno,
                    &format!("{width} columns, header has {}", table.columns.len()),
                ));
            }
            if let Some(first) = table.rows.first() {
                if first.values.len() != row.values.len() {
                    return Err(malformed(lineno, "row width differs from first row"));
                }
            }
            table.rows.push(row);
        }
        Ok(table)
    }

    /// Values of diagnostic column `column` (0 = first buffer slot).
    pub fn column(&self, column: usize) -> Vec<Scalar> {
        self.rows
            .iter()
            .filter_map(|r| r.values.get(column).copied())
            .collect()
    }

    /// Steps of every row, in file order.
    pub fn steps(&self) -> Vec<StepIndex> {
        self.rows.iter().map(|r| r.step).collect()
    }
}

fn strip_index(label: &str) -> &str {
    match label.strip_prefix('[').and_then(|rest| rest.split_once(']')) {
        Some((_, name)) => name,
        None => label,
    }
}

fn parse_row(line: &str, sep: &str, lineno: usize) -> Result<DiagRow, DiagError> {
    let mut fields = line.split(sep);
    let step = fields
        .next()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .ok_or_else(|| malformed(lineno, "missing or non-integer step"))?;
    let time = fields
        .next()
        .and_then(|s| s.trim().parse::<Scalar>().ok())
        .ok_or_else(|| malformed(lineno, "missing or non-numeric time"))?;
    let values = fields
        .map(|s| s.trim().parse::<Scalar>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| malformed(lineno, &format!("bad value: {e}")))?;
    Ok(DiagRow {
        step: StepIndex(step),
        time,
        values,
    })
}

fn malformed(line: usize, reason: &str) -> DiagError {
    DiagError::MalformedFile {
        line,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let text = "#[0]step(),[1]time(s),[2]iterations,[3]residual\n0,0,7,0.5\n4,1.5,9,1e-3\n";
        let t = DiagTable::parse(text, ",").unwrap();
        assert_eq!(t.columns.len(), 4);
        assert_eq!(t.columns[3], "residual");
        assert_eq!(t.steps(), vec![StepIndex(0), StepIndex(4)]);
        assert_eq!(t.column(0), vec![7.0, 9.0]);
        assert_eq!(t.rows[1].time, 1.5);
    }

    #[test]
    fn headerless_file_is_accepted() {
        let t = DiagTable::parse("1 0 3\n2 0 4\n", " ").unwrap();
        assert!(t.columns.is_empty());
        assert_eq!(t.rows.len(), 2);
    }

    #[test]
    fn width_mismatch_rejected() {
        let err = DiagTable::parse("#[0]step() [1]time(s) [2]x\n0 0 1 2\n", " ").unwrap_err();
        assert!(matches!(err, DiagError::MalformedFile { line: 2, .. }));
    }

    #[test]
    fn garbage_values_rejected() {
        assert!(DiagTable::parse("0 0 abc\n", " ").is_err());
        assert!(DiagTable::parse("x 0 1\n", " ").is_err());
    }

    #[test]
    fn late_header_rejected() {
        assert!(DiagTable::parse("0 0 1\n#[0]step()\n", " ").is_err());
    }
}
