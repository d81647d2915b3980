//! Assertion helpers for repository and service tests.

use std::fmt::Debug;
use uuid::Uuid;

/// Panics with `what` when the ids differ.
pub fn assert_same_id(actual: Uuid, expected: Uuid, what: &str) {
    assert_eq!(actual, expected, "{what}: expected {expected}, got {actual}");
}

/// Unwraps `value`, naming `what` on failure.
pub fn assert_some<T>(value: Option<T>, what: &str) -> T {
    match value {
        Some(inner) => inner,
        None => panic!("{what}: expected a value, found none"),
    }
}

/// Checks that `names` are in byte order, the order children are listed in.
pub fn assert_sorted_by_name<S: AsRef<str> + Debug>(names: &[S]) {
    let sorted = names.windows(2).all(|pair| pair[0].as_ref() <= pair[1].as_ref());
    assert!(sorted, "expected names in byte order, got {names:?}");
}
