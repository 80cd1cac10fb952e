//! Shared workloads for Tally benchmarks and demos.
//!
//! [`ConvergingSolver`] stands in for an iterative field solver: it drives
//! a [`FakeContext`] through a deterministic sequence of solves whose
//! residual decays and whose iteration count drifts, skipping the solve
//! on a fixed cadence.

use tally_core::{Scalar, StepIndex};
use tally_diags::{DiagError, DiagnosticSet, StepSummary};
use tally_test_utils::FakeContext;

/// Deterministic stand-in for an iterative solver.
#[derive(Clone, Debug)]
pub struct ConvergingSolver {
    /// Simulation time step, in seconds.
    pub dt: Scalar,
    /// Skip the solve on every step divisible by this (0 = never skip).
    pub skip_every: u64,
    /// Residual of the first solve.
    pub initial_residual: Scalar,
    /// Multiplicative residual decay per solved step.
    pub decay: Scalar,
    /// Iteration count of the first solve.
    pub base_iterations: u32,
}

impl Default for ConvergingSolver {
    fn default() -> Self {
        Self {
            dt: 1.0e-15,
            skip_every: 4,
            initial_residual: 1.0e-3,
            decay: 0.7,
            base_iterations: 20,
        }
    }
}

impl ConvergingSolver {
    /// Put `ctx` into the state it would have after `step`.
    pub fn advance(&self, ctx: &mut FakeContext, step: u64) {
        ctx.at(step, step as Scalar * self.dt);
        if self.skip_every != 0 && step != 0 && step % self.skip_every == 0 {
            ctx.skip();
            return;
        }
        let residual = self.initial_residual * self.decay.powi(step.min(i32::MAX as u64) as i32);
        let iterations = self.base_iterations + (step % 7) as u32;
        ctx.solve(iterations, residual);
    }

    /// Run `steps` steps through `set`, returning the summed outcomes.
    pub fn run(&self, set: &mut DiagnosticSet, steps: u64) -> Result<StepSummary, DiagError> {
        let mut ctx = FakeContext::new();
        let mut total = StepSummary::default();
        for step in 0..steps {
            self.advance(&mut ctx, step);
            let s = set.compute_diags(StepIndex(step), &ctx)?;
            total.recorded += s.recorded;
            total.skipped += s.skipped;
            total.unscheduled += s.unscheduled;
            total.disabled += s.disabled;
        }
        Ok(total)
    }
}
