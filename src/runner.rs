//! Tree execution with controlled concurrency.
//!
//! The runner resolves focus, launches one parallel execution unit per
//! entry in the resolved run-set, and joins on all of them before the
//! suite-level teardown fires. Ordering is guaranteed only within a single
//! context's own hook/spec sequence and along one ancestor chain; sibling
//! top-level contexts interleave freely.
//!
//! Spec bodies run under `catch_unwind` so one panicking body is recorded
//! as that spec's failure instead of tearing down the whole run. Hooks are
//! not isolated: a panicking hook is a broken suite, not a failing spec.

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::assert::{Assert, FailureDetail};
use crate::context::{Context, Hook, Spec};
use crate::focus;
use crate::outcome::{Outcome, RunReport, SpecOutcome};
use crate::report::Reporter;
use crate::suite::Suite;

/// Executes the whole suite (or its focused subset) and aggregates results.
///
/// Blocks until every execution unit has completed. Suite-level hooks run
/// exactly once: `setup_suite` and `before_all` on the launching thread
/// before fan-out, `after_all` and `teardown_suite` after the join.
pub fn run(suite: &mut Suite, reporter: &dyn Reporter) -> RunReport {
    let mut matched = Vec::new();
    for (idx, ctx) in suite.contexts.iter_mut().enumerate() {
        if focus::resolve(ctx) {
            matched.push(idx);
        }
    }

    let focused_mode = !matched.is_empty();
    let run_set: Vec<&Context> = if focused_mode {
        matched.iter().map(|&idx| &suite.contexts[idx]).collect()
    } else {
        suite.contexts.iter().collect()
    };

    let planned: usize = run_set
        .iter()
        .map(|ctx| planned_specs(ctx, focused_mode))
        .sum();
    reporter.title(&suite.name, planned, focused_mode);
    debug!(
        suite = %suite.name,
        units = run_set.len(),
        specs = planned,
        focused = focused_mode,
        "starting run"
    );

    run_hook(&suite.setup_suite);
    run_hook(&suite.before_all);

    let unit_results: Vec<Vec<SpecOutcome>> = run_set
        .into_par_iter()
        .map(|ctx| {
            trace!(unit = %ctx.name, "executing unit");
            let mut outcomes = Vec::new();
            execute(ctx, focused_mode, reporter, &mut outcomes);
            outcomes
        })
        .collect();

    run_hook(&suite.after_all);
    run_hook(&suite.teardown_suite);

    let report = RunReport {
        outcomes: unit_results.into_iter().flatten().collect(),
    };
    debug!(
        passed = report.passed(),
        failed = report.failed(),
        skipped = report.skipped(),
        "run finished"
    );
    reporter.summary(&report);
    report
}

/// Walks one context. `narrowed` means a focused run is drilling toward
/// focused leaves; it switches off once a node that is itself focused is
/// reached, and from there the subtree runs in full.
fn execute(ctx: &Context, narrowed: bool, reporter: &dyn Reporter, out: &mut Vec<SpecOutcome>) {
    if narrowed && !ctx.focus {
        // Drill-down: only the focused portions of this node run. An
        // inherited skip does not apply here; a focused descendant wins
        // over skip for exactly this path.
        if ctx.has_focused_spec() {
            run_hooks(&ctx.before);
            run_hooks(&ctx.just_before);
            for spec in ctx.specs.iter().filter(|s| s.focus) {
                run_spec(spec, reporter, out);
            }
            run_hooks(&ctx.after);
        }
        for &idx in ctx.focused.values() {
            execute(&ctx.children[idx], true, reporter, out);
        }
        return;
    }

    if ctx.skip {
        skip_subtree(ctx, reporter, out);
        return;
    }

    run_hooks(&ctx.before);
    run_hooks(&ctx.just_before);
    for spec in &ctx.specs {
        run_spec(spec, reporter, out);
    }
    run_hooks(&ctx.after);

    for child in &ctx.children {
        execute(child, false, reporter, out);
    }
}

fn run_spec(spec: &Spec, reporter: &dyn Reporter, out: &mut Vec<SpecOutcome>) {
    if spec.skip {
        reporter.spec_skipped(&spec.name);
        out.push(SpecOutcome {
            name: spec.name.clone(),
            outcome: Outcome::Skipped,
        });
        return;
    }

    let body = &spec.body;
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut assert = Assert::new();
        body(&mut assert);
        assert
    }));

    let outcome = match result {
        Ok(assert) => {
            let failures = assert.into_failures();
            if failures.is_empty() {
                Outcome::Passed
            } else {
                Outcome::Failed(failures)
            }
        }
        Err(payload) => Outcome::Failed(vec![FailureDetail::Panic {
            message: panic_message(payload),
        }]),
    };

    match &outcome {
        Outcome::Passed => reporter.spec_passed(&spec.name),
        Outcome::Failed(failures) => reporter.spec_failed(&spec.name, failures),
        Outcome::Skipped => unreachable!("skip handled above"),
    }
    out.push(SpecOutcome {
        name: spec.name.clone(),
        outcome,
    });
}

/// Emits one named `Skipped` outcome per spec reachable under a skipped
/// node. Hooks and bodies in the subtree never run.
fn skip_subtree(ctx: &Context, reporter: &dyn Reporter, out: &mut Vec<SpecOutcome>) {
    for spec in &ctx.specs {
        reporter.spec_skipped(&spec.name);
        out.push(SpecOutcome {
            name: spec.name.clone(),
            outcome: Outcome::Skipped,
        });
    }
    for child in &ctx.children {
        skip_subtree(child, reporter, out);
    }
}

/// Counts the outcomes the walk in [`execute`] will produce, so the title
/// can announce the run size up front.
fn planned_specs(ctx: &Context, narrowed: bool) -> usize {
    if narrowed && !ctx.focus {
        let own = ctx.specs.iter().filter(|s| s.focus).count();
        own + ctx
            .focused
            .values()
            .map(|&idx| planned_specs(&ctx.children[idx], true))
            .sum::<usize>()
    } else {
        ctx.spec_count()
    }
}

fn run_hooks(hooks: &[Hook]) {
    for hook in hooks {
        hook();
    }
}

fn run_hook(hook: &Option<Hook>) {
    if let Some(hook) = hook {
        hook();
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "spec body panicked".to_string()
    }
}
