//! Testing utilities for reductions.
//!
//! Assertion helpers for comparing reduction outputs whose ordering is not
//! part of the contract: parallel merge order is unspecified, so tests
//! should usually compare contents, not sequences.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::reductions::Groups;

/// Assert that two collections contain the same elements, ignoring order.
///
/// # Panics
///
/// Panics with both collections in the message if they differ in content.
pub fn assert_unordered_equal<T: Debug + Eq + Hash>(actual: &[T], expected: &[T]) {
    let a: HashSet<&T> = actual.iter().collect();
    let e: HashSet<&T> = expected.iter().collect();
    assert_eq!(
        a, e,
        "collection content mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
}

/// Assert that a grouping result holds exactly the expected keys, each
/// with exactly the expected members (order irrelevant).
///
/// # Panics
///
/// Panics with the full grouping in the message on any mismatch.
pub fn assert_groups_equal(actual: &Groups, expected: &[(&str, &[&str])]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "group count mismatch:\n  Expected keys: {:?}\n  Actual: {actual:?}",
        expected.iter().map(|(k, _)| *k).collect::<Vec<_>>()
    );
    for (key, members) in expected {
        let got = actual
            .get(*key)
            .unwrap_or_else(|| panic!("missing group {key:?}:\n  Actual: {actual:?}"));
        let want: HashSet<String> = members.iter().map(|s| (*s).to_string()).collect();
        assert_eq!(
            got, &want,
            "membership mismatch for group {key:?}:\n  Actual: {actual:?}"
        );
    }
}
