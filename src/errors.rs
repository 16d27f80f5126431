//! Declaration-time error handling.
//!
//! A malformed declaration (a hook or spec declared outside an open suite or
//! context, an unbalanced `finish`) means the test tree itself is broken
//! before anything has run. These errors surface immediately as values from
//! the declaration call so construction aborts at the call site, during
//! authoring or CI, instead of producing a half-built tree.

use miette::Diagnostic;
use thiserror::Error;

/// An error raised while declaring a suite through [`crate::decl`].
///
/// Every variant is fatal to the construction in progress. There is nothing
/// to recover: the suite source must be fixed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum DeclError {
    /// A context, spec, or suite-level hook was declared with no suite open.
    #[error("`{call}` requires an open suite")]
    #[diagnostic(
        code(stanza::decl::no_suite),
        help("open one with `decl::suite(\"name\")` before declaring anything else")
    )]
    NoOpenSuite { call: &'static str },

    /// A hook or spec was declared outside any `describe`/`context` block.
    #[error("`{call}` must be called inside a `describe` or `context` block")]
    #[diagnostic(
        code(stanza::decl::no_context),
        help("hooks and specs attach to the innermost open context")
    )]
    NoOpenContext { call: &'static str },

    /// `finish` was called before every open context block returned.
    #[error("`finish` called while {depth} context block(s) remain open")]
    #[diagnostic(code(stanza::decl::unbalanced_finish))]
    UnbalancedFinish { depth: usize },

    /// `finish` was called with no suite under construction.
    #[error("`finish` called with no suite under construction")]
    #[diagnostic(
        code(stanza::decl::nothing_to_finish),
        help("`decl::finish()` pairs with an earlier `decl::suite(..)`")
    )]
    NothingToFinish,
}
