//! Append-only reduced diagnostics for iterative solvers.
//!
//! A reduced diagnostic samples a handful of scalars from the running
//! simulation once per step and appends them as one row of a plain-text
//! time series. Only the designated writer among the cooperating workers
//! ever touches the file.
//!
//! # Architecture
//!
//! - [`DiagKind`] is the closed set of diagnostics: which query gates the
//!   sample, which columns are emitted, which scalars are fetched
//! - [`DiagnosticRecord`] owns the fixed-arity buffer and the
//!   step-wise compute/write protocol
//! - [`AppendingFileWriter`] opens, writes and closes the file per row
//! - [`DiagnosticSet`] drives many records per step, honoring each
//!   record's [`Schedule`] and deferring I/O failures
//! - [`DiagTable`] reads a produced file back
//!
//! # Format
//!
//! ```text
//! #[0]step() [1]time(s) [2]iterations
//! 0 0 7
//! 2 0.000000000000002 9
//! ```
//!
//! Steps whose governing solve was skipped produce no row, so readers
//! must not assume one row per simulation step.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod format;
pub mod kind;
pub mod record;
pub mod schedule;
pub mod set;
pub mod table;
pub mod writer;

pub use config::DiagConfig;
pub use error::{DeferredIoErrors, DiagError};
pub use kind::DiagKind;
pub use record::{DiagnosticRecord, StepOutcome};
pub use schedule::{Interval, Schedule};
pub use set::{DiagnosticSet, StepSummary};
pub use table::{DiagRow, DiagTable};
pub use writer::AppendingFileWriter;
