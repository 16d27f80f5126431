//! A keyed call recorder for test doubles.
//!
//! [`Mock`] records calls and plays back configured return values by method
//! name. It is deliberately unrelated to tree execution: a mock is plain
//! shared state that hooks and spec bodies consult like any other
//! collaborator.
//!
//! Querying or invoking a method that never had return values registered is
//! a test-author configuration bug, not a runtime condition: those paths
//! panic immediately and are intentionally not caught anywhere in the
//! engine.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A type-erased argument or return value.
pub type MockValue = std::sync::Arc<dyn Any + Send + Sync>;

/// Wraps a concrete value for recording or playback.
pub fn value<T: Any + Send + Sync>(v: T) -> MockValue {
    std::sync::Arc::new(v)
}

#[derive(Default)]
struct MethodRecord {
    calls: Vec<Vec<MockValue>>,
    returns: Vec<MockValue>,
}

/// A call recorder and stub, keyed by method name.
#[derive(Default)]
pub struct Mock {
    methods: Mutex<HashMap<String, MethodRecord>>,
}

impl Mock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a call and returns the configured values.
    ///
    /// # Panics
    ///
    /// Panics if no return values were registered for `name`.
    pub fn call_method(&self, name: &str, args: Vec<MockValue>) -> Vec<MockValue> {
        let mut methods = self.lock();
        let Some(record) = methods.get_mut(name) else {
            panic!("mock: no return values registered for method `{name}`");
        };
        record.calls.push(args);
        record.returns.clone()
    }

    /// Registers (or overwrites) the values played back for `name`.
    /// Recorded calls are kept.
    pub fn set_returns(&self, name: &str, values: Vec<MockValue>) {
        let mut methods = self.lock();
        methods.entry(name.to_string()).or_default().returns = values;
    }

    /// Drops the values registered for `name`. No-op for unknown methods.
    pub fn clear_returns(&self, name: &str) {
        let mut methods = self.lock();
        if let Some(record) = methods.get_mut(name) {
            record.returns = Vec::new();
        }
    }

    /// Number of recorded calls to `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` was never registered.
    pub fn call_count(&self, name: &str) -> usize {
        let methods = self.lock();
        let Some(record) = methods.get(name) else {
            panic!("mock: method `{name}` was never registered");
        };
        record.calls.len()
    }

    /// The argument at `position` of call number `call` (zero-based).
    ///
    /// # Panics
    ///
    /// Panics if `name` was never registered or the indices are out of
    /// range.
    pub fn call_param(&self, name: &str, call: usize, position: usize) -> MockValue {
        let methods = self.lock();
        let Some(record) = methods.get(name) else {
            panic!("mock: method `{name}` was never registered");
        };
        record.calls[call][position].clone()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, MethodRecord>> {
        self.methods.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_back_registered_returns() {
        let mock = Mock::new();
        mock.set_returns("get", vec![value("bob".to_string())]);

        let rets = mock.call_method("get", vec![value(2_i64)]);
        assert_eq!(rets.len(), 1);
        assert_eq!(rets[0].downcast_ref::<String>().map(String::as_str), Some("bob"));
    }

    #[test]
    fn records_calls_and_params() {
        let mock = Mock::new();
        mock.set_returns("set", vec![value(())]);
        mock.call_method("set", vec![value(2_i64), value("bob".to_string())]);
        mock.call_method("set", vec![value(3_i64), value("ann".to_string())]);

        assert_eq!(mock.call_count("set"), 2);
        let param = mock.call_param("set", 1, 0);
        assert_eq!(param.downcast_ref::<i64>(), Some(&3));
    }

    #[test]
    fn set_returns_overwrites_and_keeps_calls() {
        let mock = Mock::new();
        mock.set_returns("get", vec![value(1_i64)]);
        mock.call_method("get", vec![]);
        mock.set_returns("get", vec![value(2_i64)]);

        assert_eq!(mock.call_count("get"), 1);
        let rets = mock.call_method("get", vec![]);
        assert_eq!(rets[0].downcast_ref::<i64>(), Some(&2));
    }

    #[test]
    fn clear_returns_is_a_noop_for_unknown_methods() {
        let mock = Mock::new();
        mock.clear_returns("never");
    }

    #[test]
    #[should_panic(expected = "no return values registered")]
    fn calling_an_unregistered_method_aborts() {
        let mock = Mock::new();
        mock.call_method("get", vec![]);
    }

    #[test]
    #[should_panic(expected = "never registered")]
    fn querying_an_unregistered_method_aborts() {
        let mock = Mock::new();
        mock.call_count("get");
    }
}
