//! Header and data row rendering.
//!
//! Rows never carry a trailing newline; the writer appends it.

use std::fmt::Write as _;

use tally_core::{Scalar, StepIndex};

/// Label of the step column.
pub const STEP_COLUMN: &str = "step()";
/// Label of the time column.
pub const TIME_COLUMN: &str = "time(s)";
/// Number of columns preceding the buffer slots.
pub const LEADING_COLUMNS: usize = 2;

/// Render the commented header row.
///
/// ```
/// use tally_diags::format::header_line;
///
/// assert_eq!(
///     header_line(&["iterations"], ","),
///     "#[0]step(),[1]time(s),[2]iterations"
/// );
/// ```
pub fn header_line(columns: &[&str], sep: &str) -> String {
    let mut line = String::from("#");
    let labels = [STEP_COLUMN, TIME_COLUMN].into_iter().chain(columns.iter().copied());
    for (i, label) in labels.enumerate() {
        if i > 0 {
            line.push_str(sep);
        }
        // Writing into a String cannot fail.
        let _ = write!(line, "[{i}]{label}");
    }
    line
}

/// Render one data row: step, time, then every buffer slot.
///
/// With `precision == None` scalars use the shortest representation that
/// parses back to the same `f64`. With `Some(p)` they are printed in
/// scientific notation with `p` fractional digits.
pub fn format_row(
    step: StepIndex,
    time: Scalar,
    values: &[Scalar],
    sep: &str,
    precision: Option<usize>,
) -> String {
    let mut line = step.to_string();
    for &v in std::iter::once(&time).chain(values) {
        line.push_str(sep);
        push_scalar(&mut line, v, precision);
    }
    line
}

fn push_scalar(line: &mut String, v: Scalar, precision: Option<usize>) {
    // Writing into a String cannot fail.
    let _ = match precision {
        None => write!(line, "{v}"),
        Some(p) => write!(line, "{v:.p$e}"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_has_two_plus_arity_columns() {
        let h = header_line(&["iterations", "residual"], " ");
        assert_eq!(h, "#[0]step() [1]time(s) [2]iterations [3]residual");
        assert_eq!(h.split(' ').count(), LEADING_COLUMNS + 2);
    }

    #[test]
    fn integral_scalars_print_without_fraction() {
        assert_eq!(format_row(StepIndex(0), 0.0, &[7.0], " ", None), "0 0 7");
    }

    #[test]
    fn shortest_repr_round_trips() {
        let row = format_row(StepIndex(5), 5.0e-15, &[1.23e-9], ",", None);
        let last: f64 = row.rsplit(',').next().unwrap().parse().unwrap();
        assert_eq!(last.to_bits(), 1.23e-9_f64.to_bits());
    }

    #[test]
    fn fixed_precision_uses_scientific() {
        let row = format_row(StepIndex(1), 0.5, &[1.23e-9], " ", Some(3));
        assert_eq!(row, "1 5.000e-1 1.230e-9");
    }

    #[test]
    fn step_stays_integer_under_precision() {
        let row = format_row(StepIndex(12), 0.0, &[], " ", Some(2));
        assert!(row.starts_with("12 "));
    }
}
