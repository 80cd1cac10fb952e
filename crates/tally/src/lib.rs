//! Tally: reduced diagnostics recording for time-stepped simulations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Tally sub-crates. For most users, adding `tally` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tally::prelude::*;
//!
//! // The simulation exposes its solver state through SimulationContext.
//! struct Solver { step: u64, iterations: u32, residual: f64, skipped: bool }
//!
//! impl SimulationContext for Solver {
//!     fn current_step(&self) -> StepIndex { StepIndex(self.step) }
//!     fn current_time(&self) -> f64 { self.step as f64 * 1.0e-15 }
//!     fn is_governing_solve_skipped(&self) -> bool { self.skipped }
//!     fn iteration_count(&self) -> Result<u32, ContextError> { Ok(self.iterations) }
//!     fn residual(&self) -> Result<f64, ContextError> { Ok(self.residual) }
//! }
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = DiagConfig::in_dir(dir.path());
//! let mut diags = DiagnosticSet::new(WorkerRole::single());
//! diags.register("poisson_iters", DiagKind::IterationCount, &config).unwrap();
//!
//! let mut solver = Solver { step: 0, iterations: 7, residual: 1.0e-9, skipped: false };
//! for step in 0..3 {
//!     solver.step = step;
//!     solver.skipped = step == 1;
//!     diags.compute_diags(StepIndex(step), &solver).unwrap();
//! }
//! diags.take_deferred().unwrap();
//!
//! let table = DiagTable::read(dir.path().join("poisson_iters.txt"), " ").unwrap();
//! assert_eq!(table.rows.len(), 2);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tally-core` | Step and worker IDs, `SimulationContext`, context errors |
//! | [`diags`] | `tally-diags` | Diagnostic kinds, records, writer, schedules, sets, reader |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs and the simulation query trait (`tally-core`).
pub use tally_core as types;

/// Diagnostic recording, scheduling and file I/O (`tally-diags`).
pub use tally_diags as diags;

/// Common imports for driving diagnostics from a step loop.
pub mod prelude {
    pub use tally_core::{
        ContextError, Scalar, SimulationContext, StepIndex, WorkerRole, DESIGNATED_WRITER_RANK,
    };
    pub use tally_diags::{
        DeferredIoErrors, DiagConfig, DiagError, DiagKind, DiagTable, DiagnosticRecord,
        DiagnosticSet, Schedule, StepOutcome, StepSummary,
    };
}
