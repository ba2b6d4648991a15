//! # Ironfold
//!
//! A **pluggable reduction engine** for Rust: describe a fold once as a
//! [`ReductionSpec`] — supplier, accumulator, combiner, finisher, plus a
//! [`Characteristics`] flag set — and run it unchanged on one thread or
//! many. The engine guarantees that any spec honoring the documented
//! combiner contract produces identical results under sequential and
//! parallel execution, regardless of chunk boundaries or merge order.
//!
//! ## Key Features
//!
//! - **Data-only specs** - what to compute is a value, how to run it is a
//!   [`Runner`] decision; one spec serves both executors
//! - **Two parallel strategies** - independent per-chunk states merged via
//!   the combiner (split-merge), or one shared synchronized state with no
//!   merging at all (`CONCURRENT`)
//! - **Fail-fast errors** - the first user-function failure cancels
//!   sibling work cooperatively and surfaces with element/chunk context
//! - **Stock reductions** - [`Count`], [`Sum`], [`JoinToString`], a
//!   contributors-by-item grouping, and a range-notation bit-string
//!   decoder
//! - **Bounded merge fanout** - cap how many partial states one merge
//!   round folds together on very wide runs
//! - **Metrics** - optional run statistics and custom metrics (feature
//!   flag `metrics`, on by default)
//!
//! ## Quick Start
//!
//! ```no_run
//! use ironfold::ReductionSpec;
//! use ironfold::reductions::Sum;
//!
//! # fn main() -> anyhow::Result<()> {
//! let sum = ReductionSpec::from_fn(Sum::<u64>::new());
//!
//! // Same spec, either executor, same answer.
//! let seq = sum.reduce_seq((1..=1000).collect())?;
//! let par = sum.reduce_par((1..=1000).collect(), None, Some(8))?;
//! assert_eq!(seq, par);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### ReductionSpec
//!
//! A [`ReductionSpec<T, A, R>`](ReductionSpec) bundles the four functions
//! of the reduction protocol:
//!
//! - **supplier**: produce an empty accumulator state `A`
//! - **accumulator**: fold one element `T` into a state
//! - **combiner**: merge a second state into a first (associative; the
//!   second state is consumed)
//! - **finisher**: turn the final state into the result `R`
//!
//! Specs are immutable and cheap to clone; build them from closures
//! ([`ReductionSpec::new`], [`ReductionSpec::concurrent`]) or lift a
//! [`ReduceFn`] implementation with [`ReductionSpec::from_fn`].
//!
//! ### Characteristics
//!
//! [`Characteristics`] flags widen the set of legal execution strategies:
//! `CONCURRENT` (share one state across chunks, skip the combiner),
//! `IDENTITY_FINISH` (the state is the result), and `UNORDERED` (input
//! order is meaningless). Flags never change what a valid spec computes.
//!
//! ### Execution Modes
//!
//! - **Sequential** - [`reduce_seq`](ReductionSpec::reduce_seq) or
//!   [`ExecMode::Sequential`]: single-threaded, in input order,
//!   deterministic
//! - **Parallel** - [`reduce_par`](ReductionSpec::reduce_par) or
//!   [`ExecMode::Parallel`]: chunked over the rayon pool
//!
//! ### The combiner contract
//!
//! The engine cannot verify that a combiner is associative or that an
//! accumulator tolerates the claimed concurrency; a violating spec
//! produces silently divergent sequential/parallel results. The contract
//! is documented on [`spec`], and the test suite's job is to compare both
//! modes for every reduction it cares about.
//!
//! ## Module Overview
//!
//! - [`spec`] - `ReductionSpec`, the `ReduceFn` trait, the protocol contract
//! - [`characteristics`] - execution-strategy flags
//! - [`runner`] - sequential and parallel executors
//! - [`partition`] - input chunking for parallel runs
//! - [`reductions`] - stock folds and the worked examples
//! - [`metrics`] - run statistics and custom metrics (feature `metrics`)
//! - [`testing`] - assertion helpers for order-insensitive comparisons

pub mod characteristics;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod partition;
pub mod reductions;
pub mod runner;
pub mod spec;
pub mod testing;

// General re-exports
pub use characteristics::Characteristics;
pub use reductions::{
    Count, GroupTable, Groups, JoinToString, Sum, bit_string, contributors_by_item,
    contributors_by_item_concurrent,
};
pub use runner::{ExecMode, Runner};
pub use spec::{ReduceFn, ReductionSpec};

// Gated re-exports
#[cfg(feature = "metrics")]
pub use metrics::{CounterMetric, GaugeMetric, Metric, MetricsCollector};
