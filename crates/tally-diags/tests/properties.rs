//! Property tests over arbitrary solve/skip sequences.

use proptest::prelude::*;
use tally_core::{StepIndex, WorkerRole};
use tally_diags::{DiagConfig, DiagKind, DiagTable, DiagnosticRecord};
use tally_test_utils::{FakeContext, ScratchDir};

#[derive(Clone, Debug)]
enum Step {
    Solve { iterations: u32, residual: f64 },
    Skip,
}

fn arb_kind() -> impl Strategy<Value = DiagKind> {
    prop::sample::select(DiagKind::ALL.to_vec())
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0u32..10_000, -1.0e6f64..1.0e6).prop_map(|(iterations, residual)| Step::Solve {
            iterations,
            residual,
        }),
        1 => Just(Step::Skip),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn header_has_two_plus_arity_columns(kind in arb_kind(), sep in prop::sample::select(vec![" ", ",", "\t", ";"])) {
        let dir = ScratchDir::new();
        let cfg = DiagConfig { separator: sep.to_string(), ..DiagConfig::in_dir(dir.path()) };
        DiagnosticRecord::new("d", kind, &cfg, WorkerRole::single()).unwrap();
        let text = dir.read("d.txt").unwrap();
        prop_assert_eq!(text.lines().count(), 1);
        prop_assert_eq!(text.trim_end().split(sep).count(), 2 + kind.arity());
    }

    #[test]
    fn rows_mirror_context_and_skips_leave_gaps(
        kind in arb_kind(),
        steps in prop::collection::vec(arb_step(), 1..40),
    ) {
        let dir = ScratchDir::new();
        let cfg = DiagConfig::in_dir(dir.path());
        let mut diag = DiagnosticRecord::new("d", kind, &cfg, WorkerRole::single()).unwrap();
        let mut ctx = FakeContext::new();
        // Seed one solve so skips before any sample still have a context.
        ctx.solve(0, 0.0);
        let mut expected = Vec::new();

        for (i, step) in steps.iter().enumerate() {
            let i = i as u64;
            ctx.at(i, i as f64 * 1.0e-3);
            let before_lines = dir.line_count("d.txt");
            let before_values = diag.values().to_vec();
            match *step {
                Step::Solve { iterations, residual } => {
                    ctx.solve(iterations, residual);
                    diag.compute_diags(StepIndex(i), &ctx).unwrap();
                    prop_assert_eq!(dir.line_count("d.txt"), before_lines + 1);
                    let values = match kind {
                        DiagKind::IterationCount => vec![iterations as f64],
                        DiagKind::Residual => vec![residual],
                        DiagKind::Convergence => vec![iterations as f64, residual],
                    };
                    expected.push((i, values));
                }
                Step::Skip => {
                    ctx.skip();
                    diag.compute_diags(StepIndex(i), &ctx).unwrap();
                    prop_assert_eq!(dir.line_count("d.txt"), before_lines);
                    prop_assert_eq!(diag.values(), before_values.as_slice());
                }
            }
        }

        let table = DiagTable::read(diag.path(), " ").unwrap();
        prop_assert_eq!(table.rows.len(), expected.len());
        for (row, (step, values)) in table.rows.iter().zip(&expected) {
            prop_assert_eq!(row.step, StepIndex(*step));
            prop_assert_eq!(&row.values, values);
        }
    }

    #[test]
    fn non_writers_never_touch_disk(
        size in 2u32..8,
        steps in prop::collection::vec(arb_step(), 1..10),
    ) {
        let dir = ScratchDir::new();
        let cfg = DiagConfig::in_dir(dir.path());
        let mut ctx = FakeContext::new();
        ctx.solve(0, 0.0);
        for rank in 1..size {
            let role = WorkerRole::new(rank, size).unwrap();
            let mut diag = DiagnosticRecord::new("d", DiagKind::Convergence, &cfg, role).unwrap();
            for (i, step) in steps.iter().enumerate() {
                match *step {
                    Step::Solve { iterations, residual } => { ctx.solve(iterations, residual); }
                    Step::Skip => { ctx.skip(); }
                }
                diag.compute_diags(StepIndex(i as u64), &ctx).unwrap();
            }
        }
        prop_assert!(dir.read("d.txt").is_none());
    }
}
