//! Demo: a lock-step solver loop recording reduced diagnostics.
//!
//! Run with `RUST_LOG=tally_diags=debug` to see file creation and
//! per-step tracing.

use std::error::Error;

use tally_bench::ConvergingSolver;
use tally_core::WorkerRole;
use tally_diags::{DiagConfig, DiagKind, DiagTable, DiagnosticSet, Schedule};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dir = tempfile::tempdir()?;
    let every = DiagConfig::in_dir(dir.path());
    let sparse = DiagConfig {
        schedule: Schedule::parse("0:200:10")?,
        precision: Some(14),
        ..DiagConfig::in_dir(dir.path())
    };

    let mut diags = DiagnosticSet::new(WorkerRole::single());
    diags.register("poisson_iters", DiagKind::IterationCount, &every)?;
    diags.register("poisson_resid", DiagKind::Residual, &every)?;
    diags.register("poisson_conv", DiagKind::Convergence, &sparse)?;

    let summary = ConvergingSolver::default().run(&mut diags, 200)?;
    diags.take_deferred()?;
    info!(?summary, "run complete");

    for record in diags.iter() {
        let table = DiagTable::read(record.path(), " ")?;
        info!(
            diagnostic = record.name(),
            rows = table.rows.len(),
            last = ?table.rows.last().map(|r| r.values.clone()),
            "recorded"
        );
    }
    Ok(())
}
