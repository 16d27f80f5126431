//! Stanza: a behavior-driven test organization engine.
//!
//! Users declare nested groups of specifications ("contexts"), attach
//! setup/teardown hooks at any nesting level, mark subsets focused
//! (run-only) or skipped, and execute the resulting tree with one
//! concurrent unit per top-level context while pass/fail/skip results are
//! aggregated into a [`RunReport`].
//!
//! Two declaration styles build the same tree: the fluent builder on
//! [`Suite`] and [`Context`], and the stack-based free functions in
//! [`decl`].
//!
//! ```
//! use stanza::{BufferReporter, Suite};
//!
//! let mut suite = Suite::new("greetings");
//! suite.describe("english", |ctx| {
//!     ctx.it("greets", |assert| {
//!         assert.equal(&"hello", &"hello");
//!     });
//! });
//!
//! let report = suite.run_with(&BufferReporter::new());
//! assert!(report.success());
//! ```

pub use crate::assert::{Assert, FailureDetail};
pub use crate::context::{Context, Spec};
pub use crate::errors::DeclError;
pub use crate::outcome::{Outcome, RunReport, SpecOutcome};
pub use crate::report::{BufferReporter, ConsoleReporter, Reporter};
pub use crate::state::Shared;
pub use crate::suite::Suite;

pub mod assert;
pub mod context;
pub mod decl;
pub mod errors;
pub mod mock;
pub mod outcome;
pub mod report;
pub mod runner;
pub mod state;
pub mod suite;

mod focus;
