//! Concurrent fan-out across top-level contexts.

mod common;

use common::{mark, run_quiet, trace};
use stanza::{Shared, Suite};

#[test]
fn sibling_contexts_keep_independent_state_when_run_concurrently() {
    let left = Shared::new(0_u32);
    let right = Shared::new(0_u32);
    let mut suite = Suite::new("parallel");

    let counter = left.clone();
    suite.describe("left", move |c| {
        let hook = counter.clone();
        c.before(move || hook.update(|n| *n += 1));
        let hook = counter.clone();
        c.after(move || hook.update(|n| *n += 10));
        let read = counter.clone();
        c.it("saw setup", move |assert| assert.equal(&1, &read.get()));
    });

    let counter = right.clone();
    suite.describe("right", move |c| {
        let hook = counter.clone();
        c.before(move || hook.update(|n| *n += 2));
        let hook = counter.clone();
        c.after(move || hook.update(|n| *n += 20));
        let read = counter.clone();
        c.it("saw setup", move |assert| assert.equal(&2, &read.get()));
    });

    let report = run_quiet(&mut suite);

    assert!(report.success());
    assert_eq!(report.total(), 2);
    // Whatever the interleaving, each unit's hooks ran exactly once over
    // its own state.
    assert_eq!(left.get(), 11);
    assert_eq!(right.get(), 22);
}

#[test]
fn suite_hooks_bracket_the_run_exactly_once() {
    let t = trace();
    let mut suite = Suite::new("lifecycle");

    let setup = t.clone();
    suite.setup_suite(move || mark(&setup, "setup"));
    let before = t.clone();
    suite.before_all(move || mark(&before, "before_all"));
    let after = t.clone();
    suite.after_all(move || mark(&after, "after_all"));
    let teardown = t.clone();
    suite.teardown_suite(move || mark(&teardown, "teardown"));

    for name in ["a", "b", "c"] {
        let t = t.clone();
        suite.describe(name, move |c| {
            let unit = t.clone();
            let label = format!("unit {name}");
            c.it("spec", move |_| mark(&unit, &label));
        });
    }

    run_quiet(&mut suite);

    let events = t.get();
    assert_eq!(events.len(), 7);
    // Suite hooks fire once on the launching thread, bracketing the
    // concurrent units; unit order in between is unspecified.
    assert_eq!(events[0], "setup");
    assert_eq!(events[1], "before_all");
    assert_eq!(events[5], "after_all");
    assert_eq!(events[6], "teardown");
    for name in ["a", "b", "c"] {
        assert!(events.contains(&format!("unit {name}")));
    }
}
