//! A registry of diagnostics driven once per step.
//!
//! [`DiagnosticSet`] is what the external step driver calls into. It
//! consults each diagnostic's [`Schedule`](crate::Schedule), runs the
//! scheduled ones, and keeps the step loop in lock-step across workers
//! by never aborting on an I/O failure.
//!
//! # Error policy
//!
//! - Context failures are returned immediately. Every worker issues the
//!   same queries, so every worker fails at the same step.
//! - I/O failures only ever happen on the designated writer. Returning
//!   them would let that worker leave the step loop while the others
//!   wait at the next barrier, so instead the failing diagnostic is
//!   disabled, logged once, and the error is parked until the driver
//!   calls [`take_deferred()`](DiagnosticSet::take_deferred).
//! - A disabled diagnostic stops writing but keeps sampling, so its
//!   queries (and their failures) stay in step with the other workers.

use indexmap::IndexMap;
use tally_core::{SimulationContext, StepIndex, WorkerRole};
use tracing::{error, warn};

use crate::config::DiagConfig;
use crate::error::{DeferredIoErrors, DiagError};
use crate::kind::DiagKind;
use crate::record::{DiagnosticRecord, StepOutcome};
use crate::schedule::Schedule;

/// Per-step outcome counts returned by [`DiagnosticSet::compute_diags`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepSummary {
    /// Diagnostics that sampled and handed a row to the writer.
    pub recorded: usize,
    /// Diagnostics whose governing solve was skipped.
    pub skipped: usize,
    /// Diagnostics whose schedule excluded this step.
    pub unscheduled: usize,
    /// Scheduled diagnostics disabled by an I/O failure. They are still
    /// sampled but write nothing.
    pub disabled: usize,
}

#[derive(Debug)]
struct Entry {
    record: DiagnosticRecord,
    schedule: Schedule,
    disabled: bool,
}

/// Name-keyed diagnostics, iterated in registration order.
#[derive(Debug)]
pub struct DiagnosticSet {
    role: WorkerRole,
    entries: IndexMap<String, Entry>,
    deferred: DeferredIoErrors,
}

impl DiagnosticSet {
    /// Create an empty set for a worker with the given role.
    pub fn new(role: WorkerRole) -> Self {
        Self {
            role,
            entries: IndexMap::new(),
            deferred: DeferredIoErrors::default(),
        }
    }

    /// The role every registered diagnostic is created with.
    pub fn role(&self) -> WorkerRole {
        self.role
    }

    /// Create and register a diagnostic.
    ///
    /// If the designated writer cannot create the file, the diagnostic is
    /// still registered but disabled, and the error is deferred.
    ///
    /// # Errors
    ///
    /// [`DiagError::DuplicateName`], [`DiagError::InvalidName`] or
    /// [`DiagError::InvalidConfig`]. Nothing is registered in that case.
    pub fn register(
        &mut self,
        name: &str,
        kind: DiagKind,
        config: &DiagConfig,
    ) -> Result<(), DiagError> {
        if self.entries.contains_key(name) {
            return Err(DiagError::DuplicateName {
                name: name.to_string(),
            });
        }
        let record = DiagnosticRecord::unopened(name, kind, config, self.role)?;

        let mut disabled = false;
        if config.write_header {
            if let Err(e) = record.create_file() {
                warn!(diagnostic = name, error = %e, "diagnostic disabled: cannot create file");
                self.deferred.failures.push((name.to_string(), e));
                disabled = true;
            }
        }

        self.entries.insert(
            name.to_string(),
            Entry {
                record,
                schedule: config.schedule.clone(),
                disabled,
            },
        );
        Ok(())
    }

    /// Run every enabled, scheduled diagnostic for `step`.
    ///
    /// # Errors
    ///
    /// [`DiagError::Context`] as soon as any scheduled diagnostic's query
    /// fails, disabled ones included. I/O failures are never returned
    /// here; see the module docs.
    pub fn compute_diags(
        &mut self,
        step: StepIndex,
        ctx: &dyn SimulationContext,
    ) -> Result<StepSummary, DiagError> {
        let mut summary = StepSummary::default();
        for (name, entry) in &mut self.entries {
            if !entry.schedule.contains(step) {
                summary.unscheduled += 1;
                continue;
            }
            if entry.disabled {
                entry.record.sample(step, ctx)?;
                summary.disabled += 1;
                continue;
            }
            match entry.record.compute_diags(step, ctx) {
                Ok(StepOutcome::Recorded) => summary.recorded += 1,
                Ok(StepOutcome::Skipped) => summary.skipped += 1,
                Err(e) if e.is_io() => {
                    error!(diagnostic = %name, %step, error = %e, "diagnostic disabled after write failure");
                    entry.disabled = true;
                    summary.disabled += 1;
                    self.deferred.failures.push((name.clone(), e));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(summary)
    }

    /// I/O failures recorded so far and not yet taken.
    pub fn deferred_errors(&self) -> &DeferredIoErrors {
        &self.deferred
    }

    /// Drain deferred I/O failures, returning them as one aggregated error.
    ///
    /// Call at a point where all workers synchronize anyway (end of run,
    /// checkpoint), so the designated writer can report without
    /// desynchronizing the step loop.
    pub fn take_deferred(&mut self) -> Result<(), DeferredIoErrors> {
        if self.deferred.is_empty() {
            return Ok(());
        }
        Err(std::mem::take(&mut self.deferred))
    }

    /// Look up a diagnostic by name.
    pub fn get(&self, name: &str) -> Option<&DiagnosticRecord> {
        self.entries.get(name).map(|e| &e.record)
    }

    /// Whether `name` is registered and disabled.
    pub fn is_disabled(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|e| e.disabled)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Registered diagnostics, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticRecord> {
        self.entries.values().map(|e| &e.record)
    }

    /// Number of registered diagnostics, disabled ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no diagnostic is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
