//! Focus resolution.
//!
//! Walks the tree children-first and computes, per node, the set of child
//! subtrees that must run because something inside them is focused. Matched
//! children land in the parent's `focused` map keyed by name, so resolving
//! the same frozen tree again reaches the same set. A node matches when it
//! is focused itself, directly owns a focused spec, or has any matched
//! child.

use crate::context::Context;

/// Resolves focus for one subtree. Returns true when anything inside it,
/// the node included, is focused.
pub(crate) fn resolve(ctx: &mut Context) -> bool {
    for idx in 0..ctx.children.len() {
        if resolve(&mut ctx.children[idx]) {
            let name = ctx.children[idx].name.clone();
            ctx.focused.insert(name, idx);
        }
    }

    ctx.focus || ctx.has_focused_spec() || !ctx.focused.is_empty()
}
