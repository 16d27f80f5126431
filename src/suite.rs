//! The suite root: top-level contexts plus suite-scope lifecycle hooks.
//!
//! A suite is built once per run through the fluent methods here (or the
//! stack-based [`crate::decl`] style, which produces an identical tree) and
//! then handed to the runner. `setup`/`teardown` and `before_all`/`after_all`
//! bracket the entire run exactly once, regardless of how many execution
//! units fan out.

use std::fmt;
use std::sync::Arc;

use crate::context::{Context, Hook};
use crate::outcome::RunReport;
use crate::report::{ConsoleReporter, Reporter};
use crate::runner;

/// The root container of a test tree.
pub struct Suite {
    pub(crate) name: String,
    pub(crate) contexts: Vec<Context>,
    pub(crate) before_all: Option<Hook>,
    pub(crate) after_all: Option<Hook>,
    pub(crate) setup_suite: Option<Hook>,
    pub(crate) teardown_suite: Option<Hook>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contexts: Vec::new(),
            before_all: None,
            after_all: None,
            setup_suite: None,
            teardown_suite: None,
        }
    }

    /// Declares a top-level context.
    pub fn describe(&mut self, name: &str, build: impl FnOnce(&mut Context)) -> &mut Self {
        let mut ctx = Context::new(name);
        build(&mut ctx);
        self.contexts.push(ctx);
        self
    }

    /// Declares a focused top-level context.
    pub fn fdescribe(&mut self, name: &str, build: impl FnOnce(&mut Context)) -> &mut Self {
        let mut ctx = Context::new(name);
        ctx.focus = true;
        build(&mut ctx);
        self.contexts.push(ctx);
        self
    }

    /// Declares a skipped top-level context.
    pub fn xdescribe(&mut self, name: &str, build: impl FnOnce(&mut Context)) -> &mut Self {
        let mut ctx = Context::new(name);
        ctx.skip = true;
        build(&mut ctx);
        self.contexts.push(ctx);
        self
    }

    /// Runs once before any execution unit launches.
    pub fn before_all(&mut self, hook: impl Fn() + Send + Sync + 'static) -> &mut Self {
        self.before_all = Some(Arc::new(hook));
        self
    }

    /// Runs once after every execution unit has completed.
    pub fn after_all(&mut self, hook: impl Fn() + Send + Sync + 'static) -> &mut Self {
        self.after_all = Some(Arc::new(hook));
        self
    }

    /// Runs once at the very start of the run, ahead of `before_all`.
    pub fn setup_suite(&mut self, hook: impl Fn() + Send + Sync + 'static) -> &mut Self {
        self.setup_suite = Some(Arc::new(hook));
        self
    }

    /// Runs once at the very end of the run, after `after_all`.
    pub fn teardown_suite(&mut self, hook: impl Fn() + Send + Sync + 'static) -> &mut Self {
        self.teardown_suite = Some(Arc::new(hook));
        self
    }

    /// Executes the suite, reporting to a color-aware console reporter.
    pub fn run(&mut self) -> RunReport {
        let reporter = ConsoleReporter::auto();
        runner::run(self, &reporter)
    }

    /// Executes the suite against a caller-supplied reporter.
    pub fn run_with(&mut self, reporter: &dyn Reporter) -> RunReport {
        runner::run(self, reporter)
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("before_all", &self.before_all.is_some())
            .field("after_all", &self.after_all.is_some())
            .field("setup_suite", &self.setup_suite.is_some())
            .field("teardown_suite", &self.teardown_suite.is_some())
            .field("contexts", &self.contexts)
            .finish()
    }
}
