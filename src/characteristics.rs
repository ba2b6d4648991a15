//! Characteristics flags describing legal execution shortcuts for a spec.

use std::fmt;
use std::ops::BitOr;

/// A small flag set attached to every [`ReductionSpec`](crate::ReductionSpec).
///
/// Flags never change what a reduction computes; they widen the set of
/// execution strategies that are legal for it:
///
/// - [`CONCURRENT`](Self::CONCURRENT): the accumulator is safe to invoke
///   from many threads against one shared state, so the parallel executor
///   may skip per-chunk states and the combiner entirely.
/// - [`IDENTITY_FINISH`](Self::IDENTITY_FINISH): the finisher is the
///   identity function and the accumulator state *is* the result.
/// - [`UNORDERED`](Self::UNORDERED): input order carries no meaning, so any
///   partition and any merge order is valid.
///
/// Flags combine with `|`:
///
/// ```
/// use ironfold::Characteristics;
///
/// let c = Characteristics::CONCURRENT | Characteristics::UNORDERED;
/// assert!(c.contains(Characteristics::CONCURRENT));
/// assert!(!c.contains(Characteristics::IDENTITY_FINISH));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Characteristics(u8);

impl Characteristics {
    /// One shared accumulator state may be mutated by all chunks at once.
    pub const CONCURRENT: Self = Self(1);
    /// The finisher is the identity; the accumulator type equals the result type.
    pub const IDENTITY_FINISH: Self = Self(1 << 1);
    /// Element order is meaningless to this reduction.
    pub const UNORDERED: Self = Self(1 << 2);

    /// No flags set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// True if every flag in `other` is also set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of two flag sets.
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// `self` with every flag in `other` cleared.
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for Characteristics {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.with(rhs)
    }
}

impl fmt::Debug for Characteristics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        if self.contains(Self::CONCURRENT) {
            set.entry(&"CONCURRENT");
        }
        if self.contains(Self::IDENTITY_FINISH) {
            set.entry(&"IDENTITY_FINISH");
        }
        if self.contains(Self::UNORDERED) {
            set.entry(&"UNORDERED");
        }
        set.finish()
    }
}
