//! The assertion capability injected into spec bodies.
//!
//! Every spec invocation receives a fresh [`Assert`]. Checks record
//! structured failures instead of panicking, so all checks in one body run
//! to completion and every mismatch surfaces in the same report. The call
//! site of each check is captured through `#[track_caller]`, which is what
//! lets a failure name the exact file and line without any macro layer.

use std::fmt::Debug;
use std::panic::Location;

use serde::Serialize;

/// Structured detail for a single failed check.
///
/// Equality failures carry rendered `expected`/`actual` values; boolean
/// failures carry the asserted value. Both carry the source location of the
/// check. `Panic` records a spec body that unwound instead of returning,
/// so a stray panic is attributed to its spec rather than tearing down the
/// whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FailureDetail {
    Equality {
        expected: String,
        actual: String,
        file: String,
        line: u32,
    },
    Boolean {
        asserted: bool,
        file: String,
        line: u32,
    },
    Panic {
        message: String,
    },
}

/// Records pass/fail outcomes for the checks inside one spec body.
///
/// Supplied fresh per spec invocation and never shared across specs.
pub struct Assert {
    failures: Vec<FailureDetail>,
}

impl Assert {
    pub(crate) fn new() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    /// Asserts that `actual` equals `expected`.
    #[track_caller]
    pub fn equal<T>(&mut self, expected: &T, actual: &T)
    where
        T: PartialEq + Debug + ?Sized,
    {
        let loc = Location::caller();
        if expected != actual {
            self.failures.push(FailureDetail::Equality {
                expected: format!("{expected:?}"),
                actual: format!("{actual:?}"),
                file: loc.file().to_string(),
                line: loc.line(),
            });
        }
    }

    /// Asserts that `actual` differs from `expected`.
    #[track_caller]
    pub fn not_equal<T>(&mut self, expected: &T, actual: &T)
    where
        T: PartialEq + Debug + ?Sized,
    {
        let loc = Location::caller();
        if expected == actual {
            self.failures.push(FailureDetail::Equality {
                expected: format!("not {expected:?}"),
                actual: format!("{actual:?}"),
                file: loc.file().to_string(),
                line: loc.line(),
            });
        }
    }

    /// Asserts that `condition` holds.
    #[track_caller]
    pub fn is_true(&mut self, condition: bool) {
        let loc = Location::caller();
        if !condition {
            self.failures.push(FailureDetail::Boolean {
                asserted: condition,
                file: loc.file().to_string(),
                line: loc.line(),
            });
        }
    }

    /// Asserts that `condition` does not hold.
    #[track_caller]
    pub fn is_false(&mut self, condition: bool) {
        let loc = Location::caller();
        if condition {
            self.failures.push(FailureDetail::Boolean {
                asserted: condition,
                file: loc.file().to_string(),
                line: loc.line(),
            });
        }
    }

    pub(crate) fn into_failures(self) -> Vec<FailureDetail> {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_records_nothing_on_match() {
        let mut assert = Assert::new();
        assert.equal(&5, &5);
        assert!(assert.into_failures().is_empty());
    }

    #[test]
    fn equal_records_rendered_values_and_location() {
        let mut assert = Assert::new();
        assert.equal(&5, &6);
        let failures = assert.into_failures();
        assert_eq!(failures.len(), 1);
        match &failures[0] {
            FailureDetail::Equality {
                expected,
                actual,
                file,
                line,
            } => {
                assert_eq!(expected, "5");
                assert_eq!(actual, "6");
                assert!(file.ends_with("assert.rs"));
                assert!(*line > 0);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn checks_do_not_short_circuit() {
        let mut assert = Assert::new();
        assert.equal(&1, &2);
        assert.is_true(false);
        assert.not_equal(&"a", &"a");
        assert_eq!(assert.into_failures().len(), 3);
    }

    #[test]
    fn boolean_detail_serializes_flat() {
        let detail = FailureDetail::Boolean {
            asserted: false,
            file: "specs.rs".to_string(),
            line: 14,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["asserted"], false);
        assert_eq!(json["line"], 14);
    }
}
