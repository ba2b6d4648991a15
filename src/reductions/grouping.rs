//! Grouping reduction: contributor names keyed by the item they want.
//!
//! Two variants of the same reduction, one per parallel strategy:
//!
//! - [`contributors_by_item`] accumulates into an exclusive
//!   `HashMap<item, HashSet<contributor>>` per chunk and merges the maps
//!   per key (split-merge mode). The state is the result, so the spec is
//!   IDENTITY_FINISH.
//! - [`contributors_by_item_concurrent`] folds every chunk into one shared
//!   [`GroupTable`] (CONCURRENT mode) and unwraps it to a plain map in the
//!   finisher.
//!
//! Both are generic over the element: the caller provides a contributor
//! extractor and a wants extractor, so any "who wants what" shape fits
//! without the reduction knowing the element type.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use crate::spec::ReductionSpec;

/// The grouping result shape: item name to the set of contributors wanting it.
pub type Groups = HashMap<String, HashSet<String>>;

const SHARDS: usize = 16;

/// Concurrency-safe keyed container used as the shared accumulator state
/// of [`contributors_by_item_concurrent`].
///
/// Keys are sharded over a fixed set of mutex-guarded maps; one recorded
/// pair locks exactly one shard, so updates to keys in different shards
/// proceed concurrently and same-key updates serialize in lock-acquisition
/// order. Set insertion is commutative and idempotent, so that order never
/// affects the final groups.
pub struct GroupTable {
    shards: Vec<Mutex<Groups>>,
}

impl GroupTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shards: (0..SHARDS).map(|_| Mutex::new(HashMap::new())).collect(),
        }
    }

    fn shard(&self, key: &str) -> &Mutex<Groups> {
        let mut h = DefaultHasher::new();
        key.hash(&mut h);
        &self.shards[(h.finish() as usize) % self.shards.len()]
    }

    /// Record that `contributor` wants `item`. Re-recording a pair is a no-op.
    pub fn record(&self, item: &str, contributor: &str) {
        let mut shard = self.shard(item).lock().unwrap();
        shard
            .entry(item.to_string())
            .or_default()
            .insert(contributor.to_string());
    }

    /// Union another table into this one, per key.
    pub fn merge_from(&mut self, other: GroupTable) {
        for m in other.shards {
            for (item, contributors) in m.into_inner().unwrap() {
                let mut shard = self.shard(&item).lock().unwrap();
                shard.entry(item).or_default().extend(contributors);
            }
        }
    }

    /// Unwrap the shards into a plain mapping.
    #[must_use]
    pub fn into_groups(self) -> Groups {
        let mut out = Groups::new();
        for m in self.shards {
            for (item, contributors) in m.into_inner().unwrap() {
                out.entry(item).or_default().extend(contributors);
            }
        }
        out
    }
}

impl Default for GroupTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Group contributors under each item they want, split-merge style.
///
/// `contributor` names the element, `wants` lists the items it wants; each
/// wants-relation merges the contributor into that item's set, creating
/// the set if absent. The per-key union combiner makes any chunking
/// produce the same groups as a sequential fold.
pub fn contributors_by_item<E, C, W>(contributor: C, wants: W) -> ReductionSpec<E, Groups, Groups>
where
    E: 'static,
    C: Fn(&E) -> String + Send + Sync + 'static,
    W: Fn(&E) -> Vec<String> + Send + Sync + 'static,
{
    ReductionSpec::new(
        Groups::new,
        move |groups: &mut Groups, e: E| {
            let who = contributor(&e);
            for item in wants(&e) {
                groups.entry(item).or_default().insert(who.clone());
            }
            Ok(())
        },
        |groups: &mut Groups, other: Groups| {
            for (item, contributors) in other {
                groups.entry(item).or_default().extend(contributors);
            }
            Ok(())
        },
        |groups: Groups| Ok(groups),
    )
    .identity_finish()
}

/// Same grouping, but every chunk accumulates into one shared
/// [`GroupTable`] with no combiner call (CONCURRENT).
///
/// The combiner is still supplied — per-shard union, exactly the
/// split-merge semantics — because it remains part of the protocol even
/// though the concurrent-shared path never invokes it.
pub fn contributors_by_item_concurrent<E, C, W>(
    contributor: C,
    wants: W,
) -> ReductionSpec<E, GroupTable, Groups>
where
    E: 'static,
    C: Fn(&E) -> String + Send + Sync + 'static,
    W: Fn(&E) -> Vec<String> + Send + Sync + 'static,
{
    ReductionSpec::concurrent(
        GroupTable::new,
        move |table: &GroupTable, e: E| {
            let who = contributor(&e);
            for item in wants(&e) {
                table.record(&item, &who);
            }
            Ok(())
        },
        |table: &mut GroupTable, other: GroupTable| {
            table.merge_from(other);
            Ok(())
        },
        |table: GroupTable| Ok(table.into_groups()),
    )
}
