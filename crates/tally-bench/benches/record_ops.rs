//! Criterion micro-benchmarks for row formatting and per-step recording.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tally_bench::ConvergingSolver;
use tally_core::{StepIndex, WorkerRole};
use tally_diags::format::{format_row, header_line};
use tally_diags::{DiagConfig, DiagKind, DiagTable, DiagnosticSet};
use tally_test_utils::FakeContext;

/// Benchmark: Render one Convergence row at shortest precision.
fn bench_format_row(c: &mut Criterion) {
    let values = [42.0, 1.234_567_890_123e-9];
    c.bench_function("format_row_shortest", |b| {
        b.iter(|| {
            format_row(
                black_box(StepIndex(123_456)),
                black_box(1.23e-12),
                black_box(&values),
                " ",
                None,
            )
        });
    });
    c.bench_function("format_row_fixed14", |b| {
        b.iter(|| {
            format_row(
                black_box(StepIndex(123_456)),
                black_box(1.23e-12),
                black_box(&values),
                " ",
                Some(14),
            )
        });
    });
}

/// Benchmark: Append one row per step through the full set (open/write/close).
fn bench_set_step(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let cfg = DiagConfig::in_dir(dir.path());
    let mut set = DiagnosticSet::new(WorkerRole::single());
    set.register("iters", DiagKind::IterationCount, &cfg).unwrap();
    set.register("resid", DiagKind::Residual, &cfg).unwrap();
    let solver = ConvergingSolver {
        skip_every: 0,
        ..ConvergingSolver::default()
    };
    let mut ctx = FakeContext::new();
    let mut step = 0u64;

    c.bench_function("set_compute_two_diags", |b| {
        b.iter(|| {
            solver.advance(&mut ctx, step);
            set.compute_diags(StepIndex(step), black_box(&ctx)).unwrap();
            step += 1;
        });
    });
}

/// Benchmark: Non-writer step (queries only, no I/O).
fn bench_non_writer_step(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let cfg = DiagConfig::in_dir(dir.path());
    let mut set = DiagnosticSet::new(WorkerRole::new(1, 8).unwrap());
    set.register("conv", DiagKind::Convergence, &cfg).unwrap();
    let mut ctx = FakeContext::new();
    ctx.solve(12, 1.0e-10);

    c.bench_function("set_compute_non_writer", |b| {
        b.iter(|| set.compute_diags(black_box(StepIndex(0)), &ctx).unwrap());
    });
}

/// Benchmark: Parse a 10K-row diagnostic file.
fn bench_table_parse(c: &mut Criterion) {
    let mut text = header_line(DiagKind::Convergence.columns(), " ");
    text.push('\n');
    for step in 0..10_000u64 {
        text.push_str(&format_row(
            StepIndex(step),
            step as f64 * 1.0e-15,
            &[(step % 30) as f64, 1.0e-3 / (step as f64 + 1.0)],
            " ",
            None,
        ));
        text.push('\n');
    }

    c.bench_function("table_parse_10k", |b| {
        b.iter(|| DiagTable::parse(black_box(&text), " ").unwrap());
    });
}

criterion_group!(
    benches,
    bench_format_row,
    bench_set_step,
    bench_non_writer_step,
    bench_table_parse
);
criterion_main!(benches);
