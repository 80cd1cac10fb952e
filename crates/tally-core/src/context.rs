//! The [`SimulationContext`] trait: read-only simulation state queries.
//!
//! The simulation (step loop, field solver, decomposition) lives outside
//! Tally. Diagnostics receive a `&dyn SimulationContext` on every
//! compute call instead of reaching for a global instance, so tests can
//! substitute a fake.

use crate::error::ContextError;
use crate::id::StepIndex;
use crate::Scalar;

/// Queries a diagnostic may issue against the running simulation.
///
/// # Contract
///
/// - All methods are read-only and side-effect free; non-writer workers
///   may call them without coordinating with anyone.
/// - `iteration_count()` and `residual()` describe the most recent
///   governing solve. They return [`ContextError::NoSolveRecorded`]
///   rather than a sentinel when no solve has run.
/// - Implementations may return a NaN or infinite residual as `Ok`; the
///   diagnostics reject it as [`ContextError::NonFinite`] before it can
///   reach a file.
///
/// # Object safety
///
/// This trait is object-safe; diagnostics take `&dyn SimulationContext`.
///
/// # Examples
///
/// ```
/// use tally_core::{ContextError, Scalar, SimulationContext, StepIndex};
///
/// struct Converged;
///
/// impl SimulationContext for Converged {
///     fn current_step(&self) -> StepIndex { StepIndex(3) }
///     fn current_time(&self) -> Scalar { 3.0e-15 }
///     fn is_governing_solve_skipped(&self) -> bool { false }
///     fn iteration_count(&self) -> Result<u32, ContextError> { Ok(12) }
///     fn residual(&self) -> Result<Scalar, ContextError> { Ok(1.0e-10) }
/// }
///
/// let ctx: &dyn SimulationContext = &Converged;
/// assert_eq!(ctx.iteration_count(), Ok(12));
/// ```
pub trait SimulationContext {
    /// Index of the step currently being executed.
    fn current_step(&self) -> StepIndex;

    /// Simulation time of the current step, in seconds.
    fn current_time(&self) -> Scalar;

    /// Whether the governing solve was skipped during this step.
    fn is_governing_solve_skipped(&self) -> bool;

    /// Iterations taken by the most recent governing solve.
    fn iteration_count(&self) -> Result<u32, ContextError>;

    /// Final residual of the most recent governing solve.
    fn residual(&self) -> Result<Scalar, ContextError>;
}
