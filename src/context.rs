//! The context/spec tree.
//!
//! A [`Context`] is a named grouping node owning child contexts, specs, and
//! three ordered hook sequences (`before`, `just_before`, `after`). Hook
//! inheritance is applied at attach time: a child is created with clones of
//! its parent's hook sequences as prefixes, so after construction every
//! node's hook lists are self-contained and ancestor hooks always precede
//! the node's own. The same attach-time rule gives newly declared children
//! and specs the parent's `skip` flag.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::assert::Assert;

/// A zero-argument setup/teardown callback.
pub(crate) type Hook = Arc<dyn Fn() + Send + Sync>;

/// A spec body, invoked with a fresh assertion capability per run.
pub(crate) type SpecBody = Arc<dyn Fn(&mut Assert) + Send + Sync>;

/// A single named check.
pub struct Spec {
    pub(crate) name: String,
    pub(crate) body: SpecBody,
    pub(crate) skip: bool,
    pub(crate) focus: bool,
}

/// A named grouping node in the test tree.
pub struct Context {
    pub(crate) name: String,
    pub(crate) before: Vec<Hook>,
    pub(crate) just_before: Vec<Hook>,
    pub(crate) after: Vec<Hook>,
    pub(crate) children: Vec<Context>,
    pub(crate) specs: Vec<Spec>,
    pub(crate) skip: bool,
    pub(crate) focus: bool,
    /// Computed per run by focus resolution, keyed by child name so
    /// repeated resolution stays idempotent. Never authored directly.
    pub(crate) focused: BTreeMap<String, usize>,
}

impl Context {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before: Vec::new(),
            just_before: Vec::new(),
            after: Vec::new(),
            children: Vec::new(),
            specs: Vec::new(),
            skip: false,
            focus: false,
            focused: BTreeMap::new(),
        }
    }

    /// Creates a child carrying this node's hook prefixes and skip flag.
    pub(crate) fn new_child(&self, name: &str) -> Context {
        let mut child = Context::new(format!("{}/{}", self.name, name));
        child.before = self.before.clone();
        child.just_before = self.just_before.clone();
        child.after = self.after.clone();
        child.skip = self.skip;
        child
    }

    // ------------------------------------------------------------------
    // Hooks
    // ------------------------------------------------------------------

    /// Appends a setup hook, run before this context's specs.
    pub fn before(&mut self, hook: impl Fn() + Send + Sync + 'static) -> &mut Self {
        self.before.push(Arc::new(hook));
        self
    }

    /// Appends a hook run after all `before` hooks, immediately ahead of
    /// the spec bodies.
    pub fn just_before(&mut self, hook: impl Fn() + Send + Sync + 'static) -> &mut Self {
        self.just_before.push(Arc::new(hook));
        self
    }

    /// Appends a teardown hook, run after this context's specs.
    pub fn after(&mut self, hook: impl Fn() + Send + Sync + 'static) -> &mut Self {
        self.after.push(Arc::new(hook));
        self
    }

    // ------------------------------------------------------------------
    // Specs
    // ------------------------------------------------------------------

    /// Declares a spec under this context.
    pub fn it(&mut self, name: &str, body: impl Fn(&mut Assert) + Send + Sync + 'static) -> &mut Self {
        let skip = self.skip;
        self.push_spec(name, Arc::new(body), skip, false)
    }

    /// Declares a skipped spec. It reports `Skipped` and its body never runs.
    pub fn xit(&mut self, name: &str, body: impl Fn(&mut Assert) + Send + Sync + 'static) -> &mut Self {
        self.push_spec(name, Arc::new(body), true, false)
    }

    /// Declares a focused spec. Focus overrides any inherited skip.
    pub fn fit(&mut self, name: &str, body: impl Fn(&mut Assert) + Send + Sync + 'static) -> &mut Self {
        self.push_spec(name, Arc::new(body), false, true)
    }

    pub(crate) fn push_spec(&mut self, name: &str, body: SpecBody, skip: bool, focus: bool) -> &mut Self {
        self.specs.push(Spec {
            name: format!("{}/{}", self.name, name),
            body,
            skip,
            focus,
        });
        self
    }

    // ------------------------------------------------------------------
    // Child contexts
    // ------------------------------------------------------------------

    /// Declares a child context and populates it through `build`.
    pub fn context(&mut self, name: &str, build: impl FnOnce(&mut Context)) -> &mut Self {
        let mut child = self.new_child(name);
        build(&mut child);
        self.children.push(child);
        self
    }

    /// Declares a skipped child context. Its whole subtree reports `Skipped`.
    pub fn xcontext(&mut self, name: &str, build: impl FnOnce(&mut Context)) -> &mut Self {
        let mut child = self.new_child(name);
        child.skip = true;
        build(&mut child);
        self.children.push(child);
        self
    }

    /// Declares a focused child context, narrowing the run to focused
    /// subtrees. Focus overrides any inherited skip.
    pub fn fcontext(&mut self, name: &str, build: impl FnOnce(&mut Context)) -> &mut Self {
        let mut child = self.new_child(name);
        child.focus = true;
        child.skip = false;
        build(&mut child);
        self.children.push(child);
        self
    }

    // ------------------------------------------------------------------
    // Queries used by resolution and execution
    // ------------------------------------------------------------------

    /// Total spec count of this subtree, own specs included.
    pub(crate) fn spec_count(&self) -> usize {
        self.specs.len() + self.children.iter().map(Context::spec_count).sum::<usize>()
    }

    pub(crate) fn has_focused_spec(&self) -> bool {
        self.specs.iter().any(|s| s.focus)
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spec")
            .field("name", &self.name)
            .field("skip", &self.skip)
            .field("focus", &self.focus)
            .finish()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("name", &self.name)
            .field("before", &self.before.len())
            .field("just_before", &self.just_before.len())
            .field("after", &self.after.len())
            .field("skip", &self.skip)
            .field("focus", &self.focus)
            .field("specs", &self.specs)
            .field("children", &self.children)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_inherits_hook_prefixes_at_attach_time() {
        let mut parent = Context::new("outer");
        parent.before(|| {});
        parent.before(|| {});
        parent.just_before(|| {});
        parent.context("inner", |child| {
            child.before(|| {});
        });
        // A hook declared after the attach must not reach the child.
        parent.after(|| {});

        let child = &parent.children[0];
        assert_eq!(child.name, "outer/inner");
        assert_eq!(child.before.len(), 3);
        assert_eq!(child.just_before.len(), 1);
        assert_eq!(child.after.len(), 0);
    }

    #[test]
    fn specs_and_children_inherit_skip_at_declaration_time() {
        let mut ctx = Context::new("outer");
        ctx.skip = true;
        ctx.it("leaf", |_| {});
        ctx.context("inner", |child| {
            child.it("nested", |_| {});
        });

        assert!(ctx.specs[0].skip);
        assert!(ctx.children[0].skip);
        assert!(ctx.children[0].specs[0].skip);
    }

    #[test]
    fn fit_overrides_inherited_skip() {
        let mut ctx = Context::new("outer");
        ctx.skip = true;
        ctx.fit("focused", |_| {});
        assert!(!ctx.specs[0].skip);
        assert!(ctx.specs[0].focus);
    }

    #[test]
    fn spec_count_sums_whole_subtree() {
        let mut ctx = Context::new("root");
        ctx.it("one", |_| {});
        ctx.context("a", |a| {
            a.it("two", |_| {});
            a.context("b", |b| {
                b.it("three", |_| {});
                b.it("four", |_| {});
            });
        });
        assert_eq!(ctx.spec_count(), 4);
    }

    #[test]
    fn spec_names_are_fully_qualified() {
        let mut ctx = Context::new("root");
        ctx.context("a", |a| {
            a.it("leaf", |_| {});
        });
        assert_eq!(ctx.children[0].specs[0].name, "root/a/leaf");
    }
}
