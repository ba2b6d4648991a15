//! Concrete reductions built on the protocol.
//!
//! `basic` holds stock folds written against the [`ReduceFn`] trait;
//! `grouping` and `bitstring` are the two worked examples exercising the
//! concurrent-shared path and a non-trivial finisher, respectively.
//!
//! [`ReduceFn`]: crate::spec::ReduceFn

pub mod basic;
pub mod bitstring;
pub mod grouping;

pub use basic::{Count, JoinToString, Sum};
pub use bitstring::bit_string;
pub use grouping::{GroupTable, Groups, contributors_by_item, contributors_by_item_concurrent};
