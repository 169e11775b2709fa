//! [`Reduced`], the one-value-per-key result of a keyed reduction.
use std::hash::Hash;

use indexmap::{Equivalent, IndexMap};
use rustc_hash::FxHashSet;

use crate::{Cursor, Error, Grouped, IterSource, Pull};

/// Exactly one value per key, in the order keys were first seen upstream.
///
/// Produced by keyed terminals such as [`Grouped::reduce`], [`Grouped::count`] or
/// [`Grouped::every`]. The combinators here work on the single already-computed value of each
/// key, and the aggregate terminals (`every`, `some`, `find`, `reduce`, ...) work across keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reduced<K, V>
where
    K: Eq + Hash,
{
    entries: IndexMap<K, V>,
}

impl<K, V> Default for Reduced<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<K, V> Reduced<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Wraps an already reduced mapping.
    pub fn from_map(entries: IndexMap<K, V>) -> Self {
        Self { entries }
    }

    /// Returns the value of `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.get(key)
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if every entry passes `pred(&key, &value, position)`.
    pub fn every<Func>(self, mut pred: Func) -> bool
    where
        Func: FnMut(&K, &V, usize) -> bool,
    {
        self.entries
            .iter()
            .enumerate()
            .all(|(position, (key, value))| (pred)(key, value, position))
    }

    /// Returns `true` if any entry passes `pred(&key, &value, position)`.
    pub fn some<Func>(self, mut pred: Func) -> bool
    where
        Func: FnMut(&K, &V, usize) -> bool,
    {
        self.entries
            .iter()
            .enumerate()
            .any(|(position, (key, value))| (pred)(key, value, position))
    }

    /// Keeps the entries passing `pred(&key, &value, position)`.
    pub fn filter<Func>(self, mut pred: Func) -> Self
    where
        Func: FnMut(&K, &V, usize) -> bool,
    {
        Self::from_map(
            self.entries
                .into_iter()
                .enumerate()
                .filter(|(position, (key, value))| (pred)(key, value, *position))
                .map(|(_, entry)| entry)
                .collect(),
        )
    }

    /// Maps each value with `func(&key, value, position)`, keeping its key.
    pub fn map<Func, ValOut>(self, mut func: Func) -> Reduced<K, ValOut>
    where
        Func: FnMut(&K, V, usize) -> ValOut,
    {
        Reduced::from_map(
            self.entries
                .into_iter()
                .enumerate()
                .map(|(position, (key, value))| {
                    let value = (func)(&key, value, position);
                    (key, value)
                })
                .collect(),
        )
    }

    /// Combines all values with `func(accum, value, position)`, in key order, seeding with the
    /// first value. The first value combined therefore has position `1`.
    ///
    /// Returns [`Error::EmptyReduce`] if there are no keys.
    pub fn reduce<Func>(self, func: Func) -> Result<V, Error>
    where
        Func: FnMut(V, V, usize) -> V,
    {
        self.values().reduce(func)
    }

    /// Combines all entries with `func(accum, &key, value, position)`, in key order, starting
    /// from `init`.
    pub fn fold<Accum, Func>(self, init: Accum, mut func: Func) -> Accum
    where
        Func: FnMut(Accum, &K, V, usize) -> Accum,
    {
        self.entries
            .into_iter()
            .enumerate()
            .fold(init, |accum, (position, (key, value))| {
                (func)(accum, &key, value, position)
            })
    }

    /// Discards the first `n` keys.
    #[doc(alias = "drop")]
    pub fn skip(self, n: usize) -> Self {
        Self::from_map(self.entries.into_iter().skip(n).collect())
    }

    /// Keeps the first `n` keys.
    pub fn take(self, n: usize) -> Self {
        Self::from_map(self.entries.into_iter().take(n).collect())
    }

    /// Returns the first entry passing `pred(&key, &value, position)`.
    pub fn find<Func>(self, mut pred: Func) -> Option<(K, V)>
    where
        Func: FnMut(&K, &V, usize) -> bool,
    {
        self.entries
            .into_iter()
            .enumerate()
            .find(|(position, (key, value))| (pred)(key, value, *position))
            .map(|(_, entry)| entry)
    }

    /// Pairs each value with the position of its key.
    pub fn enumerate(self) -> Reduced<K, (usize, V)> {
        Reduced::from_map(
            self.entries
                .into_iter()
                .enumerate()
                .map(|(index, (key, value))| (key, (index, value)))
                .collect(),
        )
    }

    /// Keeps a key only if its value is the first occurrence of that value across all keys.
    ///
    /// This compares values *between* keys, whereas [`Grouped::unique`] deduplicates the
    /// values *within* each key.
    pub fn unique(self) -> Self
    where
        V: Eq + Hash + Clone,
    {
        let mut seen = FxHashSet::default();
        self.filter(|_, value, _| seen.insert(value.clone()))
    }

    /// Returns the number of keys.
    pub fn count(self) -> usize {
        self.len()
    }

    /// Calls `func(&key, value, position)` with each entry, in key order.
    pub fn for_each<Func>(self, mut func: Func)
    where
        Func: FnMut(&K, V, usize),
    {
        for (position, (key, value)) in self.entries.into_iter().enumerate() {
            let () = (func)(&key, value, position);
        }
    }

    /// Re-keys every entry with `func(&key, &value, position)`, returning to a [`Grouped`]
    /// view since several old keys may share a new one.
    pub fn reorganize_by<KeyOut, Func>(
        self,
        mut func: Func,
    ) -> Grouped<impl Pull<Item = (KeyOut, V)>>
    where
        KeyOut: Eq + Hash + Clone,
        Func: FnMut(&K, &V, usize) -> KeyOut,
    {
        Grouped::from_cursor(self.entries().map(move |(key, value), position| {
            let key = (func)(&key, &value, position);
            (key, value)
        }))
    }

    /// Yields the keys.
    pub fn keys(self) -> Cursor<IterSource<indexmap::map::IntoKeys<K, V>>> {
        Cursor::new(self.entries.into_keys())
    }

    /// Yields the values.
    pub fn values(self) -> Cursor<IterSource<indexmap::map::IntoValues<K, V>>> {
        Cursor::new(self.entries.into_values())
    }

    /// Yields the `(key, value)` entries.
    #[doc(alias = "items")]
    pub fn entries(self) -> Cursor<IterSource<indexmap::map::IntoIter<K, V>>> {
        Cursor::new(self.entries)
    }

    /// Returns the underlying mapping.
    pub fn to_map(self) -> IndexMap<K, V> {
        self.entries
    }

    /// Returns the values, dropping the keys.
    #[doc(alias = "to_array")]
    pub fn to_vec(self) -> Vec<V> {
        self.entries.into_values().collect()
    }

    /// Converts into a JSON object keyed by each key's [`Display`](std::fmt::Display) form.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn to_object(self) -> Result<serde_json::Map<String, serde_json::Value>, Error>
    where
        K: std::fmt::Display,
        V: serde::Serialize,
    {
        crate::materialize::to_object(self.entries)
    }
}

impl<K, V> IntoIterator for Reduced<K, V>
where
    K: Eq + Hash,
{
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
