//! Explicit shared-state handles for hooks and spec bodies.
//!
//! Hooks are zero-argument callbacks, so state rebound by a `before` hook
//! and read by a spec body has to travel through something both closures
//! own. [`Shared`] is that handle: a small clonable cell that makes the
//! ownership of mutated state visible at the declaration site.

use std::sync::{Arc, Mutex, PoisonError};

/// A clonable mutable cell shared between hooks and spec bodies.
///
/// Clones refer to the same underlying value. The engine adds no locking
/// beyond the cell itself: sharing one handle across sibling top-level
/// contexts that run concurrently is caller responsibility.
pub struct Shared<T>(Arc<Mutex<T>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(Mutex::new(value)))
    }

    /// Replaces the current value.
    pub fn set(&self, value: T) {
        *self.lock() = value;
    }

    /// Mutates the current value in place.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.lock());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, T> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Shared<T> {
    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.lock().clone()
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
