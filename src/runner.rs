//! Execution engine: runs a [`ReductionSpec`] sequentially or in parallel.
//!
//! The runner owns scheduling only. Sequential execution is a plain
//! left-to-right fold. Parallel execution splits the input into chunks
//! (see [`partition`](crate::partition)) and picks one of two strategies:
//!
//! - **Split-merge** (default): one accumulator state per chunk, folded
//!   independently on rayon workers, partial states merged through the
//!   spec's combiner. Merge order is unspecified; correctness rests on the
//!   combiner being associative.
//! - **Concurrent-shared** ([`Characteristics::CONCURRENT`]): a single
//!   shared state all chunks accumulate into at once, no combiner call.
//!   The state's internal synchronization is entirely the spec's job.
//!
//! Failures are fail-fast: the first user-function error aborts the
//! reduction, a cooperative flag asks sibling chunk folds to stop early,
//! and no partial result is ever returned.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;

use crate::characteristics::Characteristics;
#[cfg(feature = "metrics")]
use crate::metrics::MetricsCollector;
use crate::partition::split_chunks;
use crate::spec::ReductionSpec;

#[derive(Clone, Copy, Debug)]
pub enum ExecMode {
    Sequential,
    Parallel {
        threads: Option<usize>,
        chunks: Option<usize>,
    },
}

/// Scheduling configuration for reductions.
///
/// `default_chunks` is the chunk count used when [`ExecMode::Parallel`]
/// carries no explicit override. `fanout`, if set, bounds how many partial
/// states a single merge round folds together; rounds repeat (in parallel)
/// until one state remains. Unbounded merging is a single sequential fold.
pub struct Runner {
    pub mode: ExecMode,
    pub default_chunks: usize,
    pub fanout: Option<usize>,
    #[cfg(feature = "metrics")]
    pub metrics: Option<MetricsCollector>,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            mode: ExecMode::Parallel {
                threads: None,
                chunks: None,
            },
            default_chunks: 2 * num_cpus::get().max(2),
            fanout: None,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }
}

impl Runner {
    /// Reduce `elements` to a single result as described by `spec`.
    ///
    /// Empty input yields `finisher(supplier())` exactly, in either mode.
    pub fn reduce<T, A, R>(&self, spec: &ReductionSpec<T, A, R>, elements: Vec<T>) -> Result<R>
    where
        T: Send + 'static,
        A: Send + Sync + 'static,
        R: 'static,
    {
        #[cfg(feature = "metrics")]
        let started = std::time::Instant::now();
        #[cfg(feature = "metrics")]
        let element_count = elements.len();

        match self.mode {
            ExecMode::Sequential => {
                let out = exec_seq(spec, elements);
                #[cfg(feature = "metrics")]
                self.record(element_count, 1, started);
                out
            }
            ExecMode::Parallel { threads, chunks } => {
                if let Some(t) = threads {
                    // ok() to ignore "already built" on repeated calls in tests
                    rayon::ThreadPoolBuilder::new()
                        .num_threads(t)
                        .build_global()
                        .ok();
                }
                let chunked = split_chunks(elements, chunks.unwrap_or(self.default_chunks).max(1));
                #[cfg(feature = "metrics")]
                let chunk_count = chunked.len();
                let out = exec_parallel(spec, chunked, self.fanout);
                #[cfg(feature = "metrics")]
                self.record(element_count, chunk_count, started);
                out
            }
        }
    }

    #[cfg(feature = "metrics")]
    fn record(&self, elements: usize, chunks: usize, started: std::time::Instant) {
        if let Some(m) = &self.metrics {
            m.record_run(elements, chunks, started.elapsed());
        }
    }
}

impl<T, A, R> ReductionSpec<T, A, R>
where
    T: Send + 'static,
    A: Send + Sync + 'static,
    R: 'static,
{
    /// Reduce `elements` on the calling thread, in input order.
    pub fn reduce_seq(&self, elements: Vec<T>) -> Result<R> {
        let r = Runner {
            mode: ExecMode::Sequential,
            ..Default::default()
        };
        r.reduce(self, elements)
    }

    /// Reduce `elements` on the rayon pool. `threads` and `chunks`
    /// override the pool size and chunk count.
    pub fn reduce_par(
        &self,
        elements: Vec<T>,
        threads: Option<usize>,
        chunks: Option<usize>,
    ) -> Result<R> {
        let r = Runner {
            mode: ExecMode::Parallel { threads, chunks },
            ..Default::default()
        };
        r.reduce(self, elements)
    }
}

/// Marker error a chunk fold returns when it stopped because a sibling
/// already failed. Never reported in place of the real failure.
#[derive(Debug)]
struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("reduction cancelled after a sibling chunk failed")
    }
}

impl std::error::Error for Cancelled {}

/// Sequential executor: supplier once, accumulator per element in input
/// order, finisher once.
fn exec_seq<T, A, R>(spec: &ReductionSpec<T, A, R>, elements: Vec<T>) -> Result<R>
where
    T: 'static,
    A: 'static,
    R: 'static,
{
    let mut state = spec.make_state();
    for (idx, v) in elements.into_iter().enumerate() {
        spec.accumulate(&mut state, v)
            .with_context(|| format!("accumulator failed at element {idx}"))?;
    }
    spec.finish(state).context("finisher failed")
}

/// Parallel executor over pre-split chunks.
fn exec_parallel<T, A, R>(
    spec: &ReductionSpec<T, A, R>,
    chunks: Vec<Vec<T>>,
    fanout: Option<usize>,
) -> Result<R>
where
    T: Send + 'static,
    A: Send + Sync + 'static,
    R: 'static,
{
    // Empty input folds nothing; same boundary as the sequential path.
    if chunks.len() == 1 && chunks[0].is_empty() {
        return spec.finish(spec.make_state()).context("finisher failed");
    }

    let state = if spec.characteristics().contains(Characteristics::CONCURRENT) {
        exec_concurrent_shared(spec, chunks)?
    } else {
        exec_split_merge(spec, chunks, fanout)?
    };
    spec.finish(state).context("finisher failed")
}

/// Split-merge mode: independent per-chunk states, combiner-merged.
fn exec_split_merge<T, A, R>(
    spec: &ReductionSpec<T, A, R>,
    chunks: Vec<Vec<T>>,
    fanout: Option<usize>,
) -> Result<A>
where
    T: Send + 'static,
    A: Send + 'static,
    R: 'static,
{
    let cancelled = AtomicBool::new(false);
    let partials: Vec<Result<A>> = chunks
        .into_par_iter()
        .enumerate()
        .map(|(chunk_idx, chunk)| {
            let mut acc = spec.make_state();
            for (idx, v) in chunk.into_iter().enumerate() {
                if cancelled.load(Ordering::Relaxed) {
                    return Err(anyhow::Error::new(Cancelled));
                }
                if let Err(e) = spec.accumulate(&mut acc, v) {
                    cancelled.store(true, Ordering::Relaxed);
                    return Err(e.context(format!(
                        "accumulator failed at element {idx} of chunk {chunk_idx}"
                    )));
                }
            }
            Ok(acc)
        })
        .collect();

    let mut states = Vec::with_capacity(partials.len());
    let mut halted = None;
    for r in partials {
        match r {
            Ok(a) => states.push(a),
            Err(e) if e.downcast_ref::<Cancelled>().is_some() => {
                halted.get_or_insert(e);
            }
            Err(e) => return Err(e),
        }
    }
    if let Some(e) = halted {
        return Err(e);
    }
    merge_partials(spec, states, fanout)
}

/// Merge partial states until one remains. Each merge owns both of its
/// operands; disjoint merges within a round run concurrently.
fn merge_partials<T, A, R>(
    spec: &ReductionSpec<T, A, R>,
    mut states: Vec<A>,
    fanout: Option<usize>,
) -> Result<A>
where
    T: Send + 'static,
    A: Send + 'static,
    R: 'static,
{
    if states.is_empty() {
        return Ok(spec.make_state());
    }
    while states.len() > 1 {
        let width = fanout.unwrap_or(states.len()).max(2);
        states = states
            .into_par_iter()
            .chunks(width)
            .map(|group| {
                let mut it = group.into_iter();
                let mut acc = it.next().expect("merge group is non-empty");
                for other in it {
                    spec.combine(&mut acc, other)
                        .context("combiner failed merging partial states")?;
                }
                Ok(acc)
            })
            .collect::<Result<Vec<A>>>()?;
    }
    Ok(states.pop().expect("one merged state remains"))
}

/// Concurrent-shared mode: every chunk accumulates into one shared state.
fn exec_concurrent_shared<T, A, R>(spec: &ReductionSpec<T, A, R>, chunks: Vec<Vec<T>>) -> Result<A>
where
    T: Send + 'static,
    A: Send + Sync + 'static,
    R: 'static,
{
    let accumulate = spec
        .shared_accumulator()
        .ok_or_else(|| anyhow!("CONCURRENT spec has no shared accumulator"))?;
    let state = spec.make_state();
    let cancelled = AtomicBool::new(false);
    let outcomes: Vec<Result<()>> = chunks
        .into_par_iter()
        .enumerate()
        .map(|(chunk_idx, chunk)| {
            for (idx, v) in chunk.into_iter().enumerate() {
                if cancelled.load(Ordering::Relaxed) {
                    return Err(anyhow::Error::new(Cancelled));
                }
                if let Err(e) = accumulate(&state, v) {
                    cancelled.store(true, Ordering::Relaxed);
                    return Err(e.context(format!(
                        "accumulator failed at element {idx} of chunk {chunk_idx}"
                    )));
                }
            }
            Ok(())
        })
        .collect();

    let mut halted = None;
    for r in outcomes {
        match r {
            Ok(()) => {}
            Err(e) if e.downcast_ref::<Cancelled>().is_some() => {
                halted.get_or_insert(e);
            }
            Err(e) => return Err(e),
        }
    }
    if let Some(e) = halted {
        return Err(e);
    }
    Ok(state)
}
