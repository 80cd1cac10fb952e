//! A single reduced diagnostic and its step-wise protocol.
//!
//! # Lifecycle
//!
//! 1. [`DiagnosticRecord::new`] allocates the fixed-arity buffer and, on
//!    the designated writer only, truncates the file and writes the header.
//! 2. [`compute_diags`](DiagnosticRecord::compute_diags) runs once per
//!    scheduled step: `Skip → no-op`, or `Fetch → Store → Append`.
//! 3. The record lives for the whole run; no file handle outlives a call.
//!
//! Invoking `compute_diags` twice for the same step appends two rows.
//! Rows are not deduplicated by step index.

use std::path::Path;

use smallvec::{smallvec, SmallVec};
use tally_core::{Scalar, SimulationContext, StepIndex, WorkerRole};
use tracing::{debug, trace};

use crate::config::DiagConfig;
use crate::error::DiagError;
use crate::format::{format_row, header_line};
use crate::kind::DiagKind;
use crate::writer::AppendingFileWriter;

/// Scalar buffer. Every current kind fits inline.
pub(crate) type Buffer = SmallVec<[Scalar; 2]>;

/// What a [`compute_diags`](DiagnosticRecord::compute_diags) call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The governing solve was skipped; buffer and file are untouched.
    Skipped,
    /// The buffer was refreshed and a row was handed to the writer
    /// (a no-op on workers other than the designated writer).
    Recorded,
}

/// A reduced diagnostic bound to one output file.
#[derive(Debug)]
pub struct DiagnosticRecord {
    name: String,
    kind: DiagKind,
    buffer: Buffer,
    separator: String,
    precision: Option<usize>,
    writer: AppendingFileWriter,
    designated_writer: bool,
    samples: u64,
    rows_written: u64,
}

impl DiagnosticRecord {
    /// Create a diagnostic and, on the designated writer, its file header.
    ///
    /// # Errors
    ///
    /// - [`DiagError::InvalidName`] if `name` cannot be a file stem.
    /// - [`DiagError::InvalidConfig`] if `config` fails validation.
    /// - [`DiagError::Io`] if the designated writer cannot create the file.
    ///   Workers other than the designated writer never touch the
    ///   filesystem and so never see this error.
    pub fn new(
        name: impl Into<String>,
        kind: DiagKind,
        config: &DiagConfig,
        role: WorkerRole,
    ) -> Result<Self, DiagError> {
        let record = Self::unopened(name, kind, config, role)?;
        if config.write_header {
            record.create_file()?;
        }
        Ok(record)
    }

    /// Validate and allocate without touching the filesystem.
    pub(crate) fn unopened(
        name: impl Into<String>,
        kind: DiagKind,
        config: &DiagConfig,
        role: WorkerRole,
    ) -> Result<Self, DiagError> {
        let name = name.into();
        validate_name(&name)?;
        config.validate()?;

        Ok(Self {
            writer: AppendingFileWriter::new(config.file_path(&name)),
            buffer: smallvec![0.0; kind.arity()],
            separator: config.separator.clone(),
            precision: config.precision,
            designated_writer: role.is_designated_writer(),
            samples: 0,
            rows_written: 0,
            name,
            kind,
        })
    }

    /// Truncate the file and write the header. No-op on non-writers.
    pub(crate) fn create_file(&self) -> Result<(), DiagError> {
        if !self.designated_writer {
            return Ok(());
        }
        let header = header_line(self.kind.columns(), &self.separator);
        self.writer.create_with_header(&header)?;
        debug!(
            diagnostic = %self.name,
            path = %self.writer.path().display(),
            "created diagnostic file"
        );
        Ok(())
    }

    /// Sample the simulation for `step` and append a row.
    ///
    /// When the kind's skip predicate holds, returns
    /// [`StepOutcome::Skipped`] without touching the buffer or the file.
    /// Otherwise every slot is refreshed from `ctx` and
    /// [`write_to_file`](Self::write_to_file) is invoked.
    ///
    /// # Errors
    ///
    /// [`DiagError::Context`] if a query fails; the buffer keeps its
    /// previous values. [`DiagError::Io`] if the append fails.
    pub fn compute_diags(
        &mut self,
        step: StepIndex,
        ctx: &dyn SimulationContext,
    ) -> Result<StepOutcome, DiagError> {
        let outcome = self.sample(step, ctx)?;
        if outcome == StepOutcome::Recorded {
            self.write_to_file(step, ctx)?;
        }
        Ok(outcome)
    }

    /// Run the skip check and refresh the buffer, without any I/O.
    ///
    /// Issues exactly the queries [`compute_diags`](Self::compute_diags)
    /// issues, so a worker whose file is unusable still fails on the same
    /// step as its peers.
    pub fn sample(
        &mut self,
        step: StepIndex,
        ctx: &dyn SimulationContext,
    ) -> Result<StepOutcome, DiagError> {
        if self.kind.is_skipped(ctx) {
            trace!(diagnostic = %self.name, %step, "governing solve skipped");
            return Ok(StepOutcome::Skipped);
        }

        let mut fresh: Buffer = smallvec![0.0; self.kind.arity()];
        self.kind
            .fetch(ctx, &mut fresh)
            .map_err(|source| DiagError::Context {
                name: self.name.clone(),
                source,
            })?;
        self.buffer.copy_from_slice(&fresh);
        self.samples += 1;
        trace!(diagnostic = %self.name, %step, values = ?self.buffer.as_slice(), "sampled");
        Ok(StepOutcome::Recorded)
    }

    /// Append the current buffer as a row for `step`.
    ///
    /// No-op on every worker but the designated writer.
    pub fn write_to_file(
        &mut self,
        step: StepIndex,
        ctx: &dyn SimulationContext,
    ) -> Result<(), DiagError> {
        if !self.designated_writer {
            return Ok(());
        }
        let line = format_row(
            step,
            ctx.current_time(),
            &self.buffer,
            &self.separator,
            self.precision,
        );
        self.writer.append_line(&line)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Unique diagnostic name (the file stem).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Diagnostic variant.
    pub fn kind(&self) -> DiagKind {
        self.kind
    }

    /// Most recently stored values, one per column. Zero before the
    /// first sample.
    pub fn values(&self) -> &[Scalar] {
        &self.buffer
    }

    /// Backing file path (exists only on the designated writer).
    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    /// Whether this worker performs the file I/O.
    pub fn is_designated_writer(&self) -> bool {
        self.designated_writer
    }

    /// Number of non-skipped computations, on any worker.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Number of rows appended by this worker.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

fn validate_name(name: &str) -> Result<(), DiagError> {
    let reject = |reason| {
        Err(DiagError::InvalidName {
            name: name.to_string(),
            reason,
        })
    };
    if name.trim().is_empty() {
        return reject("name must not be empty");
    }
    if name.contains(['/', '\\']) {
        return reject("name must not contain path separators");
    }
    if name == "." || name == ".." {
        return reject("name must not be a relative path component");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_test_utils::{FakeContext, ScratchDir};

    fn record(dir: &ScratchDir, name: &str, kind: DiagKind) -> DiagnosticRecord {
        let cfg = DiagConfig::in_dir(dir.path());
        DiagnosticRecord::new(name, kind, &cfg, WorkerRole::single()).unwrap()
    }

    #[test]
    fn buffer_starts_zeroed_at_arity() {
        let dir = ScratchDir::new();
        let rec = record(&dir, "conv", DiagKind::Convergence);
        assert_eq!(rec.values(), &[0.0, 0.0]);
    }

    #[test]
    fn header_written_at_construction() {
        let dir = ScratchDir::new();
        record(&dir, "poisson_iters", DiagKind::IterationCount);
        assert_eq!(
            dir.read("poisson_iters.txt").unwrap(),
            "#[0]step() [1]time(s) [2]iterations\n"
        );
    }

    #[test]
    fn header_disabled_leaves_no_file() {
        let dir = ScratchDir::new();
        let cfg = DiagConfig {
            write_header: false,
            ..DiagConfig::in_dir(dir.path())
        };
        DiagnosticRecord::new("quiet", DiagKind::Residual, &cfg, WorkerRole::single()).unwrap();
        assert!(dir.read("quiet.txt").is_none());
    }

    #[test]
    fn skipped_step_keeps_buffer() {
        let dir = ScratchDir::new();
        let mut rec = record(&dir, "resid", DiagKind::Residual);
        let mut ctx = FakeContext::new();
        ctx.solve(3, 0.25);
        rec.compute_diags(StepIndex(0), &ctx).unwrap();

        ctx.at(1, 1.0).solve(9, 0.5).skip();
        let outcome = rec.compute_diags(StepIndex(1), &ctx).unwrap();
        assert_eq!(outcome, StepOutcome::Skipped);
        assert_eq!(rec.values(), &[0.25]);
        assert_eq!(rec.rows_written(), 1);
    }

    #[test]
    fn context_failure_leaves_buffer_and_file() {
        let dir = ScratchDir::new();
        let mut rec = record(&dir, "iters", DiagKind::IterationCount);
        let ctx = FakeContext::new();
        let err = rec.compute_diags(StepIndex(0), &ctx).unwrap_err();
        assert!(matches!(err, DiagError::Context { ref name, .. } if name == "iters"));
        assert_eq!(rec.values(), &[0.0]);
        assert_eq!(dir.line_count("iters.txt"), 1);
    }

    #[test]
    fn non_writer_samples_but_never_writes() {
        let dir = ScratchDir::new();
        let role = WorkerRole::new(2, 4).unwrap();
        let cfg = DiagConfig::in_dir(dir.path());
        let mut rec = DiagnosticRecord::new("iters", DiagKind::IterationCount, &cfg, role).unwrap();
        let mut ctx = FakeContext::new();
        ctx.solve(5, 1.0);
        assert_eq!(rec.compute_diags(StepIndex(0), &ctx).unwrap(), StepOutcome::Recorded);
        assert_eq!(rec.values(), &[5.0]);
        assert_eq!(rec.samples(), 1);
        assert_eq!(rec.rows_written(), 0);
        assert!(dir.read("iters.txt").is_none());
    }

    #[test]
    fn sample_updates_buffer_without_io() {
        let dir = ScratchDir::new();
        let mut rec = record(&dir, "conv", DiagKind::Convergence);
        let mut ctx = FakeContext::new();
        ctx.solve(6, 0.75);
        assert_eq!(rec.sample(StepIndex(0), &ctx).unwrap(), StepOutcome::Recorded);
        assert_eq!(rec.values(), &[6.0, 0.75]);
        assert_eq!(rec.samples(), 1);
        assert_eq!(rec.rows_written(), 0);
        assert_eq!(dir.line_count("conv.txt"), 1);
    }

    #[test]
    fn invalid_names_rejected() {
        let dir = ScratchDir::new();
        let cfg = DiagConfig::in_dir(dir.path());
        for name in ["", "  ", "a/b", "..", "x\\y"] {
            let err = DiagnosticRecord::new(name, DiagKind::Residual, &cfg, WorkerRole::single())
                .unwrap_err();
            assert!(matches!(err, DiagError::InvalidName { .. }), "accepted {name:?}");
        }
    }

    #[test]
    fn header_failure_surfaces_as_io_error() {
        let dir = ScratchDir::new();
        std::fs::create_dir(dir.join("blocked.txt")).unwrap();
        let err = DiagnosticRecord::new(
            "blocked",
            DiagKind::Residual,
            &DiagConfig::in_dir(dir.path()),
            WorkerRole::single(),
        )
        .unwrap_err();
        assert!(err.is_io());
    }
}
