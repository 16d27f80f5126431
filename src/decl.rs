//! Stack-based declaration style.
//!
//! The alternative to the fluent builder: free functions that operate on a
//! thread-local declaration stack scoped to one suite's construction
//! phase. The stack lives per thread, never in process-wide state, so
//! suites built on different threads cannot observe each other.
//!
//! Every operation returns `Result`; declaring outside an open suite or
//! context yields a [`DeclError`] at the call site. Block bodies are
//! `FnOnce() -> Result<(), DeclError>` so misuse anywhere in a nested
//! declaration aborts the whole construction through `?`.
//!
//! Both styles produce identical tree shapes:
//!
//! ```
//! use stanza::decl;
//!
//! # fn main() -> Result<(), stanza::DeclError> {
//! decl::suite("arithmetic");
//! decl::describe("addition", || {
//!     decl::it("adds small numbers", |assert| {
//!         assert.equal(&4, &(2 + 2));
//!     })?;
//!     Ok(())
//! })?;
//! let mut suite = decl::finish()?;
//! # let _ = suite;
//! # Ok(())
//! # }
//! ```

use std::cell::RefCell;

use crate::assert::Assert;
use crate::context::Context;
use crate::errors::DeclError;
use crate::suite::Suite;

struct Frame {
    ctx: Context,
    /// True for `describe` frames, which attach to the suite rather than
    /// to an enclosing context.
    root: bool,
}

struct Builder {
    suite: Suite,
    stack: Vec<Frame>,
}

thread_local! {
    static CURRENT: RefCell<Option<Builder>> = const { RefCell::new(None) };
}

/// Opens a new suite, replacing any unfinished declaration on this thread.
pub fn suite(name: impl Into<String>) {
    CURRENT.with(|cell| {
        *cell.borrow_mut() = Some(Builder {
            suite: Suite::new(name),
            stack: Vec::new(),
        });
    });
}

/// Closes the declaration and returns the built suite.
pub fn finish() -> Result<Suite, DeclError> {
    CURRENT.with(|cell| {
        let mut slot = cell.borrow_mut();
        match slot.take() {
            None => Err(DeclError::NothingToFinish),
            Some(builder) if !builder.stack.is_empty() => Err(DeclError::UnbalancedFinish {
                depth: builder.stack.len(),
            }),
            Some(builder) => Ok(builder.suite),
        }
    })
}

// ----------------------------------------------------------------------
// Contexts
// ----------------------------------------------------------------------

/// Declares a top-level context.
pub fn describe(
    name: &str,
    body: impl FnOnce() -> Result<(), DeclError>,
) -> Result<(), DeclError> {
    open_root(name, false, false, "describe")?;
    close(body())
}

/// Declares a focused top-level context.
pub fn fdescribe(
    name: &str,
    body: impl FnOnce() -> Result<(), DeclError>,
) -> Result<(), DeclError> {
    open_root(name, true, false, "fdescribe")?;
    close(body())
}

/// Declares a skipped top-level context.
pub fn xdescribe(
    name: &str,
    body: impl FnOnce() -> Result<(), DeclError>,
) -> Result<(), DeclError> {
    open_root(name, false, true, "xdescribe")?;
    close(body())
}

/// Declares a child context under the innermost open block.
pub fn context(
    name: &str,
    body: impl FnOnce() -> Result<(), DeclError>,
) -> Result<(), DeclError> {
    open_child(name, false, false, "context")?;
    close(body())
}

/// Declares a focused child context. Focus overrides any inherited skip.
pub fn fcontext(
    name: &str,
    body: impl FnOnce() -> Result<(), DeclError>,
) -> Result<(), DeclError> {
    open_child(name, true, false, "fcontext")?;
    close(body())
}

/// Declares a skipped child context.
pub fn xcontext(
    name: &str,
    body: impl FnOnce() -> Result<(), DeclError>,
) -> Result<(), DeclError> {
    open_child(name, false, true, "xcontext")?;
    close(body())
}

// ----------------------------------------------------------------------
// Hooks and specs
// ----------------------------------------------------------------------

/// Attaches a `before` hook to the innermost open context.
pub fn before(hook: impl Fn() + Send + Sync + 'static) -> Result<(), DeclError> {
    with_open_context("before", |ctx| {
        ctx.before(hook);
    })
}

/// Attaches a `just_before` hook to the innermost open context.
pub fn just_before(hook: impl Fn() + Send + Sync + 'static) -> Result<(), DeclError> {
    with_open_context("just_before", |ctx| {
        ctx.just_before(hook);
    })
}

/// Attaches an `after` hook to the innermost open context.
pub fn after(hook: impl Fn() + Send + Sync + 'static) -> Result<(), DeclError> {
    with_open_context("after", |ctx| {
        ctx.after(hook);
    })
}

/// Declares a spec under the innermost open context.
pub fn it(
    name: &str,
    body: impl Fn(&mut Assert) + Send + Sync + 'static,
) -> Result<(), DeclError> {
    with_open_context("it", |ctx| {
        ctx.it(name, body);
    })
}

/// Declares a skipped spec.
pub fn xit(
    name: &str,
    body: impl Fn(&mut Assert) + Send + Sync + 'static,
) -> Result<(), DeclError> {
    with_open_context("xit", |ctx| {
        ctx.xit(name, body);
    })
}

/// Declares a focused spec.
pub fn fit(
    name: &str,
    body: impl Fn(&mut Assert) + Send + Sync + 'static,
) -> Result<(), DeclError> {
    with_open_context("fit", |ctx| {
        ctx.fit(name, body);
    })
}

// ----------------------------------------------------------------------
// Suite-level hooks
// ----------------------------------------------------------------------

pub fn before_all(hook: impl Fn() + Send + Sync + 'static) -> Result<(), DeclError> {
    with_suite("before_all", |suite| {
        suite.before_all(hook);
    })
}

pub fn after_all(hook: impl Fn() + Send + Sync + 'static) -> Result<(), DeclError> {
    with_suite("after_all", |suite| {
        suite.after_all(hook);
    })
}

pub fn setup_suite(hook: impl Fn() + Send + Sync + 'static) -> Result<(), DeclError> {
    with_suite("setup_suite", |suite| {
        suite.setup_suite(hook);
    })
}

pub fn teardown_suite(hook: impl Fn() + Send + Sync + 'static) -> Result<(), DeclError> {
    with_suite("teardown_suite", |suite| {
        suite.teardown_suite(hook);
    })
}

// ----------------------------------------------------------------------
// Stack plumbing
// ----------------------------------------------------------------------

fn open_root(name: &str, focus: bool, skip: bool, call: &'static str) -> Result<(), DeclError> {
    CURRENT.with(|cell| {
        let mut slot = cell.borrow_mut();
        let builder = slot.as_mut().ok_or(DeclError::NoOpenSuite { call })?;
        let mut ctx = Context::new(name);
        ctx.focus = focus;
        ctx.skip = skip;
        builder.stack.push(Frame { ctx, root: true });
        Ok(())
    })
}

fn open_child(name: &str, focus: bool, skip: bool, call: &'static str) -> Result<(), DeclError> {
    CURRENT.with(|cell| {
        let mut slot = cell.borrow_mut();
        let builder = slot.as_mut().ok_or(DeclError::NoOpenSuite { call })?;
        let parent = builder
            .stack
            .last()
            .map(|frame| &frame.ctx)
            .ok_or(DeclError::NoOpenContext { call })?;
        let mut ctx = parent.new_child(name);
        if focus {
            ctx.focus = true;
            ctx.skip = false;
        }
        if skip {
            ctx.skip = true;
        }
        builder.stack.push(Frame { ctx, root: false });
        Ok(())
    })
}

/// Pops the current frame and attaches it. The body's own result wins over
/// any bookkeeping error so the first misuse is the one reported.
fn close(body_result: Result<(), DeclError>) -> Result<(), DeclError> {
    let closed = CURRENT.with(|cell| {
        let mut slot = cell.borrow_mut();
        let builder = slot.as_mut().ok_or(DeclError::NothingToFinish)?;
        let frame = builder
            .stack
            .pop()
            .ok_or(DeclError::NothingToFinish)?;
        if frame.root {
            builder.suite.contexts.push(frame.ctx);
        } else if let Some(parent) = builder.stack.last_mut() {
            parent.ctx.children.push(frame.ctx);
        } else {
            builder.suite.contexts.push(frame.ctx);
        }
        Ok(())
    });
    body_result.and(closed)
}

fn with_open_context(
    call: &'static str,
    f: impl FnOnce(&mut Context),
) -> Result<(), DeclError> {
    CURRENT.with(|cell| {
        let mut slot = cell.borrow_mut();
        let builder = slot.as_mut().ok_or(DeclError::NoOpenSuite { call })?;
        let frame = builder
            .stack
            .last_mut()
            .ok_or(DeclError::NoOpenContext { call })?;
        f(&mut frame.ctx);
        Ok(())
    })
}

fn with_suite(call: &'static str, f: impl FnOnce(&mut Suite)) -> Result<(), DeclError> {
    CURRENT.with(|cell| {
        let mut slot = cell.borrow_mut();
        let builder = slot.as_mut().ok_or(DeclError::NoOpenSuite { call })?;
        f(&mut builder.suite);
        Ok(())
    })
}
