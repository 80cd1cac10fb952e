//! Step scheduling policy for diagnostics.
//!
//! A [`Schedule`] decides *whether* a diagnostic is consulted at a given
//! step. The step driver checks it before calling
//! [`compute_diags`](crate::DiagnosticRecord::compute_diags); the record
//! itself never looks at it.
//!
//! # Syntax
//!
//! [`Schedule::parse`] accepts a comma-separated list of intervals:
//!
//! | Form               | Meaning                                 |
//! |--------------------|-----------------------------------------|
//! | `n`                | every `n` steps starting at 0           |
//! | `start:stop`       | every step in `[start, stop]`           |
//! | `start:stop:n`     | every `n` steps in `[start, stop]`      |
//!
//! Either bound may be empty: `:` is "every step", `100:` is "every step
//! from 100 on". A step is scheduled if any interval contains it.

use std::str::FromStr;

use tally_core::StepIndex;

use crate::error::DiagError;

/// A closed, strided range of steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    /// First step of the range.
    pub start: u64,
    /// Last step of the range (inclusive). `None` = unbounded.
    pub stop: Option<u64>,
    /// Stride between contained steps. Always at least 1.
    pub period: u64,
}

impl Interval {
    /// Whether `step` falls in this interval.
    pub fn contains(&self, step: u64) -> bool {
        if step < self.start {
            return false;
        }
        if self.stop.is_some_and(|stop| step > stop) {
            return false;
        }
        (step - self.start) % self.period == 0
    }
}

/// When a diagnostic is consulted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Schedule {
    /// Every step.
    #[default]
    Always,
    /// No step. The diagnostic still writes its header.
    Never,
    /// Steps contained in at least one interval.
    Intervals(Vec<Interval>),
}

impl Schedule {
    /// Every `period` steps starting at step 0.
    ///
    /// A period of 0 yields [`Schedule::Never`].
    pub fn every(period: u64) -> Self {
        if period == 0 {
            return Self::Never;
        }
        Self::Intervals(vec![Interval {
            start: 0,
            stop: None,
            period,
        }])
    }

    /// Exactly the listed steps.
    pub fn at_steps(steps: &[u64]) -> Self {
        if steps.is_empty() {
            return Self::Never;
        }
        Self::Intervals(
            steps
                .iter()
                .map(|&s| Interval {
                    start: s,
                    stop: Some(s),
                    period: 1,
                })
                .collect(),
        )
    }

    /// Whether `step` is scheduled.
    pub fn contains(&self, step: StepIndex) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Intervals(list) => list.iter().any(|i| i.contains(step.0)),
        }
    }

    /// Parse the interval syntax described in the [module docs](self).
    pub fn parse(input: &str) -> Result<Self, DiagError> {
        let invalid = |reason: String| DiagError::InvalidSchedule {
            input: input.to_string(),
            reason,
        };
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty schedule".into()));
        }

        let mut intervals = Vec::new();
        for entry in trimmed.split(',') {
            let entry = entry.trim();
            let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
            let interval = match parts.as_slice() {
                [period] => Interval {
                    start: 0,
                    stop: None,
                    period: parse_period(period).map_err(&invalid)?,
                },
                [start, stop] => Interval {
                    start: parse_bound(start).map_err(&invalid)?.unwrap_or(0),
                    stop: parse_bound(stop).map_err(&invalid)?,
                    period: 1,
                },
                [start, stop, period] => Interval {
                    start: parse_bound(start).map_err(&invalid)?.unwrap_or(0),
                    stop: parse_bound(stop).map_err(&invalid)?,
                    period: parse_period(period).map_err(&invalid)?,
                },
                _ => return Err(invalid(format!("too many ':' in '{entry}'"))),
            };
            if interval.stop.is_some_and(|stop| stop < interval.start) {
                return Err(invalid(format!("stop before start in '{entry}'")));
            }
            intervals.push(interval);
        }
        Ok(Self::Intervals(intervals))
    }
}

impl FromStr for Schedule {
    type Err = DiagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_bound(s: &str) -> Result<Option<u64>, String> {
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<u64>()
        .map(Some)
        .map_err(|_| format!("'{s}' is not a non-negative step"))
}

fn parse_period(s: &str) -> Result<u64, String> {
    match parse_bound(s)? {
        None => Ok(1),
        Some(0) => Err("period must be at least 1".into()),
        Some(p) => Ok(p),
    }
}
