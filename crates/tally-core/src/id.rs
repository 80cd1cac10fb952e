//! Strongly-typed step index and worker role.

use std::fmt;

use crate::error::RoleError;

/// Rank of the worker that owns all diagnostic file I/O.
///
/// By convention this is the coordinating (root) process of the
/// cooperating set.
pub const DESIGNATED_WRITER_RANK: u32 = 0;

/// Index of a simulation time step.
///
/// Steps are supplied by the external step driver; the diagnostics never
/// advance or reorder them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepIndex(pub u64);

impl fmt::Display for StepIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepIndex {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Position of this process within the set of cooperating workers.
///
/// Exactly one worker in a set reports
/// [`is_designated_writer()`](WorkerRole::is_designated_writer); every
/// other worker treats diagnostic I/O as a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkerRole {
    rank: u32,
    size: u32,
}

impl WorkerRole {
    /// Build a role for `rank` within a set of `size` workers.
    pub fn new(rank: u32, size: u32) -> Result<Self, RoleError> {
        if size == 0 {
            return Err(RoleError::EmptyWorkerSet);
        }
        if rank >= size {
            return Err(RoleError::RankOutOfRange { rank, size });
        }
        Ok(Self { rank, size })
    }

    /// The role of a serial run: rank 0 of 1.
    pub fn single() -> Self {
        Self { rank: 0, size: 1 }
    }

    /// This worker's rank.
    pub fn rank(&self) -> u32 {
        self.rank
    }

    /// Number of workers in the cooperating set.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether this worker performs diagnostic file I/O.
    pub fn is_designated_writer(&self) -> bool {
        self.rank == DESIGNATED_WRITER_RANK
    }
}

impl Default for WorkerRole {
    fn default() -> Self {
        Self::single()
    }
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.rank, self.size)
    }
}
