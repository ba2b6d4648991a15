//! The reduction protocol: [`ReductionSpec`] and the [`ReduceFn`] trait.
//!
//! A `ReductionSpec<T, A, R>` is a data-only description of a fold over
//! elements of type `T`: a supplier producing an empty accumulator state
//! `A`, an accumulator folding one element into a state, a combiner merging
//! two states, a finisher turning the fully-folded state into the result
//! `R`, and a [`Characteristics`] flag set. The spec says *what* to
//! compute; the [`runner`](crate::runner) decides *how* — the same spec
//! value runs unchanged under sequential and parallel execution.
//!
//! # The combiner contract
//!
//! The engine cannot check these properties; violating them makes
//! sequential and parallel runs silently diverge:
//!
//! - the combiner must be **associative** over all reachable states;
//! - the combiner may mutate and keep its first argument ("merge in
//!   place"), but its second argument is consumed by the call;
//! - a sequential left-to-right fold and any chunking-plus-combine of the
//!   same elements must produce equal results, up to reordering when
//!   [`Characteristics::UNORDERED`] is set.
//!
//! # Exclusive vs. shared accumulation
//!
//! Specs built with [`ReductionSpec::new`] accumulate through `&mut A` and
//! parallelize by folding independent per-chunk states. Specs built with
//! [`ReductionSpec::concurrent`] accumulate through `&A` (the state
//! synchronizes internally) and parallelize by racing every chunk against
//! one shared state with no combiner call. Only the latter constructor
//! sets [`Characteristics::CONCURRENT`], so a spec can never claim
//! concurrency safety its accumulator does not have.

use std::sync::Arc;

use anyhow::Result;

use crate::characteristics::Characteristics;

/// The accumulator slot of a spec. Exclusive accumulation mutates a state
/// it owns; shared accumulation goes through `&A` and requires the state
/// to synchronize internally.
pub(crate) enum AccumFn<T, A> {
    Exclusive(Arc<dyn Fn(&mut A, T) -> Result<()> + Send + Sync>),
    Shared(Arc<dyn Fn(&A, T) -> Result<()> + Send + Sync>),
}

impl<T, A> Clone for AccumFn<T, A> {
    fn clone(&self) -> Self {
        match self {
            Self::Exclusive(f) => Self::Exclusive(Arc::clone(f)),
            Self::Shared(f) => Self::Shared(Arc::clone(f)),
        }
    }
}

/// An immutable, reusable description of one reduction.
///
/// Construct with [`new`](Self::new), [`concurrent`](Self::concurrent), or
/// [`from_fn`](Self::from_fn), then hand it to a
/// [`Runner`](crate::runner::Runner) or use the
/// [`reduce_seq`](Self::reduce_seq) / [`reduce_par`](Self::reduce_par)
/// shorthands. Cloning is cheap (the function slots are shared).
///
/// ```no_run
/// use ironfold::ReductionSpec;
///
/// let sum = ReductionSpec::new(
///     || 0u64,
///     |acc: &mut u64, v: u64| {
///         *acc += v;
///         Ok(())
///     },
///     |acc: &mut u64, other: u64| {
///         *acc += other;
///         Ok(())
///     },
///     |acc: u64| Ok(acc),
/// );
///
/// assert_eq!(sum.reduce_seq(vec![1, 2, 3, 4])?, 10);
/// # Ok::<_, anyhow::Error>(())
/// ```
pub struct ReductionSpec<T, A, R> {
    supplier: Arc<dyn Fn() -> A + Send + Sync>,
    accumulator: AccumFn<T, A>,
    combiner: Arc<dyn Fn(&mut A, A) -> Result<()> + Send + Sync>,
    finisher: Arc<dyn Fn(A) -> Result<R> + Send + Sync>,
    characteristics: Characteristics,
}

impl<T, A, R> Clone for ReductionSpec<T, A, R> {
    fn clone(&self) -> Self {
        Self {
            supplier: Arc::clone(&self.supplier),
            accumulator: self.accumulator.clone(),
            combiner: Arc::clone(&self.combiner),
            finisher: Arc::clone(&self.finisher),
            characteristics: self.characteristics,
        }
    }
}

impl<T: 'static, A: 'static, R: 'static> ReductionSpec<T, A, R> {
    /// Build a spec with an exclusive accumulator (`&mut A`).
    ///
    /// Parallel execution gives each chunk its own state and merges the
    /// partials through `combiner`. No characteristics are set; chain
    /// [`unordered`](Self::unordered) or
    /// [`identity_finish`](Self::identity_finish) as appropriate.
    pub fn new<S, U, C, F>(supplier: S, accumulator: U, combiner: C, finisher: F) -> Self
    where
        S: Fn() -> A + Send + Sync + 'static,
        U: Fn(&mut A, T) -> Result<()> + Send + Sync + 'static,
        C: Fn(&mut A, A) -> Result<()> + Send + Sync + 'static,
        F: Fn(A) -> Result<R> + Send + Sync + 'static,
    {
        Self {
            supplier: Arc::new(supplier),
            accumulator: AccumFn::Exclusive(Arc::new(accumulator)),
            combiner: Arc::new(combiner),
            finisher: Arc::new(finisher),
            characteristics: Characteristics::empty(),
        }
    }

    /// Build a spec whose accumulator is safe under concurrent invocation
    /// against one shared state.
    ///
    /// Sets [`Characteristics::CONCURRENT`]. The state type must carry its
    /// own synchronization (the engine adds no locking), which is why the
    /// accumulator takes `&A` and `A` must be [`Sync`]. The combiner is
    /// still part of the protocol and must satisfy the same contract, even
    /// though the concurrent-shared execution path never calls it.
    pub fn concurrent<S, U, C, F>(supplier: S, accumulator: U, combiner: C, finisher: F) -> Self
    where
        A: Sync,
        S: Fn() -> A + Send + Sync + 'static,
        U: Fn(&A, T) -> Result<()> + Send + Sync + 'static,
        C: Fn(&mut A, A) -> Result<()> + Send + Sync + 'static,
        F: Fn(A) -> Result<R> + Send + Sync + 'static,
    {
        Self {
            supplier: Arc::new(supplier),
            accumulator: AccumFn::Shared(Arc::new(accumulator)),
            combiner: Arc::new(combiner),
            finisher: Arc::new(finisher),
            characteristics: Characteristics::CONCURRENT,
        }
    }

    /// Wrap a [`ReduceFn`] implementation as a spec.
    ///
    /// Trait accumulation is exclusive, so a CONCURRENT flag reported by
    /// `f.characteristics()` is ignored.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: ReduceFn<T, A, R>,
    {
        let characteristics = f.characteristics().without(Characteristics::CONCURRENT);
        let f = Arc::new(f);
        let supplier = {
            let f = Arc::clone(&f);
            Arc::new(move || f.create()) as Arc<dyn Fn() -> A + Send + Sync>
        };
        let accumulator = {
            let f = Arc::clone(&f);
            AccumFn::Exclusive(Arc::new(move |acc: &mut A, v: T| {
                f.add_input(acc, v);
                Ok(())
            }))
        };
        let combiner = {
            let f = Arc::clone(&f);
            Arc::new(move |acc: &mut A, other: A| {
                f.merge(acc, other);
                Ok(())
            }) as Arc<dyn Fn(&mut A, A) -> Result<()> + Send + Sync>
        };
        let finisher =
            Arc::new(move |acc: A| Ok(f.finish(acc))) as Arc<dyn Fn(A) -> Result<R> + Send + Sync>;
        Self {
            supplier,
            accumulator,
            combiner,
            finisher,
            characteristics,
        }
    }

    /// Mark element order as meaningless to this reduction.
    pub fn unordered(mut self) -> Self {
        self.characteristics = self.characteristics.with(Characteristics::UNORDERED);
        self
    }

    /// The flag set this spec was built with.
    pub fn characteristics(&self) -> Characteristics {
        self.characteristics
    }

    pub(crate) fn make_state(&self) -> A {
        (self.supplier)()
    }

    /// Fold one element into an exclusively-owned state. Works for both
    /// accumulator shapes; a shared accumulator just borrows the state.
    pub(crate) fn accumulate(&self, acc: &mut A, v: T) -> Result<()> {
        match &self.accumulator {
            AccumFn::Exclusive(f) => f(acc, v),
            AccumFn::Shared(f) => f(acc, v),
        }
    }

    /// The shared accumulator slot, if this spec was built with one.
    pub(crate) fn shared_accumulator(&self) -> Option<Arc<dyn Fn(&A, T) -> Result<()> + Send + Sync>> {
        match &self.accumulator {
            AccumFn::Shared(f) => Some(Arc::clone(f)),
            AccumFn::Exclusive(_) => None,
        }
    }

    pub(crate) fn combine(&self, acc: &mut A, other: A) -> Result<()> {
        (self.combiner)(acc, other)
    }

    pub(crate) fn finish(&self, acc: A) -> Result<R> {
        (self.finisher)(acc)
    }
}

impl<T: 'static, A: 'static> ReductionSpec<T, A, A> {
    /// Declare the finisher to be the identity.
    ///
    /// Only available when the accumulator and result types coincide, which
    /// is exactly the condition IDENTITY_FINISH promises. The finishing
    /// step becomes a move of the accumulator state.
    pub fn identity_finish(mut self) -> Self {
        self.finisher = Arc::new(|acc| Ok(acc));
        self.characteristics = self.characteristics.with(Characteristics::IDENTITY_FINISH);
        self
    }
}

/// Teacher-style reduction protocol for infallible reductions: implement
/// `create`/`add_input`/`merge`/`finish` and lift the implementation into a
/// spec with [`ReductionSpec::from_fn`].
///
/// The same algebraic contract applies: `merge` must be associative, and
/// folding elements one-by-one from `create()` must agree with any
/// chunked-then-merged evaluation.
pub trait ReduceFn<V, A, O>: Send + Sync + 'static {
    /// Produce an empty accumulator state.
    fn create(&self) -> A;
    /// Fold one value into a state.
    fn add_input(&self, acc: &mut A, v: V);
    /// Merge a second state into the first. The second state is consumed.
    fn merge(&self, acc: &mut A, other: A);
    /// Transform the final state into the result.
    fn finish(&self, acc: A) -> O;

    /// Flags to attach when lifted into a spec. CONCURRENT is never
    /// honored here; trait accumulation is exclusive by shape.
    fn characteristics(&self) -> Characteristics {
        Characteristics::empty()
    }
}
