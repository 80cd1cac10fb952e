//! Core types and traits for Tally reduced diagnostics.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the step and worker identifiers, the scalar type recorded by every
//! diagnostic, and the [`SimulationContext`] trait through which the
//! diagnostics query the running simulation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod error;
pub mod id;

pub use context::SimulationContext;
pub use error::{ContextError, RoleError};
pub use id::{StepIndex, WorkerRole, DESIGNATED_WRITER_RANK};

/// Scalar type stored in diagnostic buffers and written to files.
///
/// Integer metrics such as iteration counts are widened into this type;
/// every `u32` is exactly representable.
pub type Scalar = f64;
