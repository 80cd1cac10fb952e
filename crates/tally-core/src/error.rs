//! Error types shared across the Tally workspace.

use thiserror::Error;

/// A [`SimulationContext`](crate::SimulationContext) query could not
/// produce a valid value.
///
/// Each variant names the queried quantity so the failure is attributable
/// to the diagnostic that asked for it.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ContextError {
    /// The quantity was queried before any governing solve ran.
    #[error("no solve recorded yet: cannot query {quantity}")]
    NoSolveRecorded {
        /// Name of the queried quantity.
        quantity: &'static str,
    },
    /// The solver reported a NaN or infinite value.
    #[error("{quantity} is not finite: {value}")]
    NonFinite {
        /// Name of the queried quantity.
        quantity: &'static str,
        /// The offending value.
        value: f64,
    },
}

/// Invalid [`WorkerRole`](crate::WorkerRole) construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RoleError {
    /// A worker set must contain at least one worker.
    #[error("worker set size must be at least 1")]
    EmptyWorkerSet,
    /// The rank does not fall inside the worker set.
    #[error("rank {rank} out of range for worker set of size {size}")]
    RankOutOfRange {
        /// The requested rank.
        rank: u32,
        /// The worker set size.
        size: u32,
    },
}
