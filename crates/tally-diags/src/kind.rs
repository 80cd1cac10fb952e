//! The closed set of reduced diagnostics.
//!
//! Each [`DiagKind`] fixes three things: the skip predicate, the buffer
//! columns, and the scalars fetched when the step is not skipped.

use std::fmt;
use std::str::FromStr;

use tally_core::{ContextError, Scalar, SimulationContext};

use crate::error::DiagError;

/// A reduced diagnostic variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagKind {
    /// Iterations taken by the governing solve.
    IterationCount,
    /// Final residual of the governing solve.
    Residual,
    /// Iterations and final residual of the governing solve, side by side.
    Convergence,
}

impl DiagKind {
    /// Every variant, in declaration order.
    pub const ALL: [DiagKind; 3] = [Self::IterationCount, Self::Residual, Self::Convergence];

    /// Buffer column names, one per slot.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::IterationCount => &["iterations"],
            Self::Residual => &["residual"],
            Self::Convergence => &["iterations", "residual"],
        }
    }

    /// Number of buffer slots.
    pub fn arity(self) -> usize {
        self.columns().len()
    }

    /// Whether this step contributes no sample.
    pub fn is_skipped(self, ctx: &dyn SimulationContext) -> bool {
        match self {
            Self::IterationCount | Self::Residual | Self::Convergence => {
                ctx.is_governing_solve_skipped()
            }
        }
    }

    /// Fetch one value per column into `out`.
    ///
    /// `out` must have exactly [`arity()`](Self::arity) slots. On error
    /// the contents of `out` are unspecified. A NaN or infinite residual
    /// is rejected with [`ContextError::NonFinite`].
    pub(crate) fn fetch(
        self,
        ctx: &dyn SimulationContext,
        out: &mut [Scalar],
    ) -> Result<(), ContextError> {
        debug_assert_eq!(out.len(), self.arity());
        match self {
            Self::IterationCount => {
                out[0] = Scalar::from(ctx.iteration_count()?);
            }
            Self::Residual => {
                out[0] = finite_residual(ctx)?;
            }
            Self::Convergence => {
                out[0] = Scalar::from(ctx.iteration_count()?);
                out[1] = finite_residual(ctx)?;
            }
        }
        Ok(())
    }

    /// Stable lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IterationCount => "iteration_count",
            Self::Residual => "residual",
            Self::Convergence => "convergence",
        }
    }
}

fn finite_residual(ctx: &dyn SimulationContext) -> Result<Scalar, ContextError> {
    let value = ctx.residual()?;
    if !value.is_finite() {
        return Err(ContextError::NonFinite {
            quantity: "residual",
            value,
        });
    }
    Ok(value)
}

impl fmt::Display for DiagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagKind {
    type Err = DiagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| DiagError::UnknownKind {
                value: s.to_string(),
            })
    }
}
