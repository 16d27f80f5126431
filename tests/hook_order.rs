//! Hook inheritance and ordering across nested contexts.

mod common;

use common::{mark, run_quiet, trace, Trace};
use stanza::{Context, Outcome, Shared, Suite};

fn record(ctx: &mut Context, t: &Trace, label: &'static str) {
    let before = t.clone();
    ctx.before(move || mark(&before, &format!("{label}.before")));
    let just_before = t.clone();
    ctx.just_before(move || mark(&just_before, &format!("{label}.just_before")));
    let after = t.clone();
    ctx.after(move || mark(&after, &format!("{label}.after")));
}

#[test]
fn ancestor_hooks_run_outermost_first() {
    let t = trace();
    let mut suite = Suite::new("order");

    let outer = t.clone();
    suite.describe("a", move |a| {
        record(a, &outer, "a");
        let mid = outer.clone();
        a.context("b", move |b| {
            record(b, &mid, "b");
            let inner = mid.clone();
            b.context("c", move |c| {
                record(c, &inner, "c");
                let body = inner.clone();
                c.it("leaf", move |_| mark(&body, "body"));
            });
        });
    });

    run_quiet(&mut suite);

    // One execution unit, so the whole walk is deterministic: each context
    // visit replays its inherited chain, outermost hooks first.
    assert_eq!(
        t.get(),
        vec![
            // visit a
            "a.before",
            "a.just_before",
            "a.after",
            // visit a/b
            "a.before",
            "b.before",
            "a.just_before",
            "b.just_before",
            "a.after",
            "b.after",
            // visit a/b/c
            "a.before",
            "b.before",
            "c.before",
            "a.just_before",
            "b.just_before",
            "c.just_before",
            "body",
            "a.after",
            "b.after",
            "c.after",
        ]
    );
}

#[test]
fn nested_before_hooks_rebind_state_for_inner_specs() {
    let num = Shared::new(0);
    let mut suite = Suite::new("S");

    let outer = num.clone();
    suite.describe("A", move |a| {
        let set = outer.clone();
        a.before(move || set.set(3));
        let read = outer.clone();
        a.it("t1", move |assert| assert.equal(&3, &read.get()));

        let inner = outer.clone();
        a.context("B", move |b| {
            let set = inner.clone();
            b.before(move || set.set(6));
            let read = inner.clone();
            b.it("t2", move |assert| assert.equal(&6, &read.get()));
        });
    });

    let report = run_quiet(&mut suite);
    assert_eq!(report.total(), 2);
    assert_eq!(report.outcome_for("A/t1"), Some(&Outcome::Passed));
    assert_eq!(report.outcome_for("A/B/t2"), Some(&Outcome::Passed));
}
