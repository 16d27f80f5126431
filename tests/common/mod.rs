//! Shared helpers for the integration suites.

#![allow(dead_code)]

use stanza::{BufferReporter, RunReport, Shared, Suite};

/// An event log shared between hooks and spec bodies.
pub type Trace = Shared<Vec<String>>;

pub fn trace() -> Trace {
    Shared::default()
}

pub fn mark(trace: &Trace, label: &str) {
    let label = label.to_string();
    trace.update(|events| events.push(label));
}

/// Runs a suite without touching stdout.
pub fn run_quiet(suite: &mut Suite) -> RunReport {
    suite.run_with(&BufferReporter::new())
}
