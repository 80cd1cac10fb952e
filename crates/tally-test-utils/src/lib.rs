//! Test utilities and fake simulation contexts for Tally development.
//!
//! Provides [`FakeContext`], a scriptable [`SimulationContext`], and
//! [`ScratchDir`] for tests that need a throwaway output directory.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use tally_core::{ContextError, Scalar, SimulationContext, StepIndex};

/// Result of the most recent governing solve, as seen by [`FakeContext`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveResult {
    pub iterations: u32,
    pub residual: Scalar,
}

/// Scriptable implementation of [`SimulationContext`].
///
/// Starts at step 0, time 0, with no solve recorded, so the solver
/// queries return [`ContextError::NoSolveRecorded`] until
/// [`solve`](FakeContext::solve) is called.
///
/// ```
/// use tally_core::SimulationContext;
/// use tally_test_utils::FakeContext;
///
/// let mut ctx = FakeContext::new();
/// assert!(ctx.iteration_count().is_err());
/// ctx.solve(7, 1.0e-9);
/// assert_eq!(ctx.iteration_count(), Ok(7));
/// ```
#[derive(Clone, Debug, Default)]
pub struct FakeContext {
    step: StepIndex,
    time: Scalar,
    skipped: bool,
    last_solve: Option<SolveResult>,
}

impl FakeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to `step` at simulation time `time`.
    pub fn at(&mut self, step: u64, time: Scalar) -> &mut Self {
        self.step = StepIndex(step);
        self.time = time;
        self
    }

    /// Record a governing solve for the current step.
    pub fn solve(&mut self, iterations: u32, residual: Scalar) -> &mut Self {
        self.skipped = false;
        self.last_solve = Some(SolveResult {
            iterations,
            residual,
        });
        self
    }

    /// Mark the governing solve as skipped for the current step.
    ///
    /// The previous solve result stays queryable, matching a solver that
    /// simply did not run this step.
    pub fn skip(&mut self) -> &mut Self {
        self.skipped = true;
        self
    }

    /// Forget every recorded solve.
    pub fn reset(&mut self) -> &mut Self {
        self.last_solve = None;
        self.skipped = false;
        self
    }

    pub fn last_solve(&self) -> Option<SolveResult> {
        self.last_solve
    }
}

impl SimulationContext for FakeContext {
    fn current_step(&self) -> StepIndex {
        self.step
    }

    fn current_time(&self) -> Scalar {
        self.time
    }

    fn is_governing_solve_skipped(&self) -> bool {
        self.skipped
    }

    fn iteration_count(&self) -> Result<u32, ContextError> {
        self.last_solve
            .map(|s| s.iterations)
            .ok_or(ContextError::NoSolveRecorded {
                quantity: "iteration count",
            })
    }

    fn residual(&self) -> Result<Scalar, ContextError> {
        let solve = self.last_solve.ok_or(ContextError::NoSolveRecorded {
            quantity: "residual",
        })?;
        if !solve.residual.is_finite() {
            return Err(ContextError::NonFinite {
                quantity: "residual",
                value: solve.residual,
            });
        }
        Ok(solve.residual)
    }
}

/// Temporary output directory removed on drop.
pub struct ScratchDir {
    inner: tempfile::TempDir,
}

impl ScratchDir {
    /// Create a fresh scratch directory.
    ///
    /// # Panics
    ///
    /// Panics if the system temp directory is unusable; this is test-only
    /// code.
    pub fn new() -> Self {
        Self {
            inner: tempfile::tempdir().expect("failed to create scratch dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Path of `name` inside the scratch directory.
    pub fn join(&self, name: &str) -> PathBuf {
        self.inner.path().join(name)
    }

    /// Read a file inside the scratch directory, or `None` if absent.
    pub fn read(&self, name: &str) -> Option<String> {
        std::fs::read_to_string(self.join(name)).ok()
    }

    /// Number of lines in a file inside the scratch directory (0 if absent).
    pub fn line_count(&self, name: &str) -> usize {
        self.read(name).map(|s| s.lines().count()).unwrap_or(0)
    }
}

impl Default for ScratchDir {
    fn default() -> Self {
        Self::new()
    }
}
