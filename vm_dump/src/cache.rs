//! Lazy, memoizing entity tables.
//!
//! Every concrete table (creatures, items, ...) supplies an [`EntitySource`]:
//! the list of valid keys plus a fetch that reads one entry from the game.
//! [`LazyTable`] only memoizes successful fetches. The game may still be
//! loading data, so a key that cannot be fetched now is tried again on the
//! next lookup.

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use ahash::AHashMap;

use crate::error::DumpError;

pub trait EntitySource {
    type Key: Clone + Eq + Hash + Debug;
    type Value;

    /// Name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Every key the table considers valid, in enumeration order. Slots the
    /// game has not materialized yet must be left out.
    fn keys(&self) -> Vec<Self::Key>;

    fn fetch(&self, key: &Self::Key) -> Option<Self::Value>;
}

/// [`EntitySource`] made from a pair of closures.
pub struct FnSource<K, V, KF, FF> {
    name: &'static str,
    keys: KF,
    fetch: FF,
    _entry: PhantomData<fn() -> (K, V)>,
}

impl<K, V, KF, FF> FnSource<K, V, KF, FF>
where
    KF: Fn() -> Vec<K>,
    FF: Fn(&K) -> Option<V>,
{
    pub fn new(name: &'static str, keys: KF, fetch: FF) -> Self {
        Self {
            name,
            keys,
            fetch,
            _entry: PhantomData,
        }
    }
}

impl<K, V, KF, FF> EntitySource for FnSource<K, V, KF, FF>
where
    K: Clone + Eq + Hash + Debug,
    KF: Fn() -> Vec<K>,
    FF: Fn(&K) -> Option<V>,
{
    type Key = K;
    type Value = V;

    fn name(&self) -> &'static str {
        self.name
    }

    fn keys(&self) -> Vec<K> {
        (self.keys)()
    }

    fn fetch(&self, key: &K) -> Option<V> {
        (self.fetch)(key)
    }
}

/// Memoizing table over one [`EntitySource`]. Lives as long as the process
/// needs the entity kind; see [`TableRegistry`](crate::registry::TableRegistry).
pub struct LazyTable<S: EntitySource> {
    source: S,
    memo: AHashMap<S::Key, S::Value>,
    count: Option<usize>,
}

impl<S: EntitySource> LazyTable<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            memo: AHashMap::new(),
            count: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.source.name()
    }

    /// Cached entry for `key`, fetching it first if needed.
    pub fn get(&mut self, key: &S::Key) -> Option<&S::Value> {
        if !self.memo.contains_key(key) && !self.load(key) {
            return None;
        }
        self.memo.get(key)
    }

    /// Like [`get`](Self::get), for keys the caller knows are valid.
    pub fn require(&mut self, key: &S::Key) -> Result<&S::Value, DumpError> {
        let table = self.name();
        self.get(key).ok_or_else(|| DumpError::KeyUnresolvable {
            table,
            key: format!("{key:?}"),
        })
    }

    /// Fetches `key` if it is not cached and reports whether it is now.
    pub fn contains(&mut self, key: &S::Key) -> bool {
        self.memo.contains_key(key) || self.load(key)
    }

    /// Whether `key` is cached. Never fetches.
    pub fn is_cached(&self, key: &S::Key) -> bool {
        self.memo.contains_key(key)
    }

    pub fn cached_len(&self) -> usize {
        self.memo.len()
    }

    /// Current key list of the source. Not cached.
    pub fn keys(&self) -> Vec<S::Key> {
        self.source.keys()
    }

    /// Every entry in key order.
    ///
    /// Fails at the first key the source lists but cannot fetch. Entries
    /// fetched before that key stay cached.
    pub fn values(&mut self) -> Result<Vec<&S::Value>, DumpError> {
        let keys = self.source.keys();
        for key in &keys {
            if !self.contains(key) {
                return Err(DumpError::KeyUnresolvable {
                    table: self.name(),
                    key: format!("{key:?}"),
                });
            }
        }

        let table = self.name();
        let memo = &self.memo;
        keys.iter()
            .map(|key| {
                memo.get(key).ok_or_else(|| {
                    DumpError::InvariantViolation(format!(
                        "table '{table}' dropped cached key {key:?}"
                    ))
                })
            })
            .collect()
    }

    /// Number of keys, taken once on first call and never refreshed.
    pub fn count(&mut self) -> usize {
        if let Some(count) = self.count {
            return count;
        }
        let count = self.source.keys().len();
        tracing::debug!(
            target: "vm_dump::cache",
            table = self.source.name(),
            count,
            "cache.count_snapshot"
        );
        self.count = Some(count);
        count
    }

    fn load(&mut self, key: &S::Key) -> bool {
        match self.source.fetch(key) {
            Some(value) => {
                tracing::trace!(
                    target: "vm_dump::cache",
                    table = self.source.name(),
                    key = ?key,
                    "cache.memoized"
                );
                self.memo.insert(key.clone(), value);
                true
            }
            None => {
                tracing::debug!(
                    target: "vm_dump::cache",
                    table = self.source.name(),
                    key = ?key,
                    "cache.fetch_miss"
                );
                false
            }
        }
    }
}
