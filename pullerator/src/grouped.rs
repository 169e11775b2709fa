//! [`Grouped`], the synchronous keyed aggregation view.
use std::hash::Hash;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::key_table::{KeyIndex, KeyTable};
use crate::materialize::group_pairs;
use crate::{Cursor, IterSource, Pull, Reduced};

/// A lazy view over `(key, value)` pairs which applies combinators independently per key.
///
/// Values are never bucketed up front. Each stage keeps only the per-key state it needs (an
/// index counter, a seen-set, an accumulator) and the pairs keep flowing in source order.
/// Callbacks receive the key, the value, and the value's *per-key* index, which counts only
/// earlier pairs with the same key.
///
/// ```rust
/// use pullerator::Cursor;
///
/// let sums = Cursor::new([-3, -1, 0, 2, 3, 5, 6, 8])
///     .group_by(|x, _| if x % 2 == 0 { "even" } else { "odd" })
///     .reduce(|_, acc, x, _| acc + x);
/// assert_eq!(Some(&4), sums.get(&"odd"));
/// assert_eq!(Some(&16), sums.get(&"even"));
/// ```
#[must_use = "cursors do nothing unless pulled"]
pub struct Grouped<P> {
    cursor: Cursor<P>,
}

impl<I, K, V> Grouped<IterSource<I>>
where
    I: Iterator<Item = (K, V)>,
    K: Eq + Hash + Clone,
{
    /// Creates a view over a sequence of pairs.
    pub fn new(pairs: impl IntoIterator<IntoIter = I>) -> Self {
        Self::from_cursor(Cursor::new(pairs))
    }
}

impl<P, K, V> Grouped<P>
where
    P: Pull<Item = (K, V)>,
    K: Eq + Hash + Clone,
{
    /// Creates a view over a cursor of pairs.
    pub fn from_cursor(cursor: Cursor<P>) -> Self {
        Self { cursor }
    }

    /// Releases the underlying source early.
    pub fn close(&mut self) {
        self.cursor.close();
    }

    /// Returns, per key, whether every value passes `pred`.
    ///
    /// A key's result is fixed at its first failure and `pred` is not called for it again,
    /// while the source keeps being drained for the other keys.
    pub fn every<Func>(self, mut pred: Func) -> Reduced<K, bool>
    where
        Func: FnMut(&K, &V, usize) -> bool,
    {
        let mut cursor = self.cursor;
        let mut table = KeyTable::default();
        while let Some((key, value)) = cursor.pull() {
            let (index, passed) = table.visit(&key, |_| true);
            if *passed {
                *passed = (pred)(&key, &value, index);
            }
        }
        Reduced::from_map(table.into_states())
    }

    /// Returns, per key, whether any value passes `pred`.
    ///
    /// A key's result is fixed at its first success, see [`Grouped::every`].
    pub fn some<Func>(self, mut pred: Func) -> Reduced<K, bool>
    where
        Func: FnMut(&K, &V, usize) -> bool,
    {
        let mut cursor = self.cursor;
        let mut table = KeyTable::default();
        while let Some((key, value)) = cursor.pull() {
            let (index, passed) = table.visit(&key, |_| false);
            if !*passed {
                *passed = (pred)(&key, &value, index);
            }
        }
        Reduced::from_map(table.into_states())
    }

    /// Lazily keeps the pairs passing `pred`.
    pub fn filter<Func>(self, mut pred: Func) -> Grouped<impl Pull<Item = (K, V)>>
    where
        Func: FnMut(&K, &V, usize) -> bool,
    {
        let mut indices = KeyIndex::default();
        Grouped::from_cursor(self.cursor.filter(move |(key, value), _| {
            let index = indices.next_index(key);
            (pred)(key, value, index)
        }))
    }

    /// Lazily maps each value with `func`, keeping its key.
    pub fn map<Func, ValOut>(self, mut func: Func) -> Grouped<impl Pull<Item = (K, ValOut)>>
    where
        Func: FnMut(&K, V, usize) -> ValOut,
    {
        let mut indices = KeyIndex::default();
        Grouped::from_cursor(self.cursor.map(move |(key, value), _| {
            let index = indices.next_index(&key);
            let value = (func)(&key, value, index);
            (key, value)
        }))
    }

    /// Lazily maps each value to an iterable and flattens it one level under the same key.
    pub fn flat_map<Func, IntoIter>(
        self,
        mut func: Func,
    ) -> Grouped<impl Pull<Item = (K, IntoIter::Item)>>
    where
        Func: FnMut(&K, V, usize) -> IntoIter,
        IntoIter: IntoIterator,
    {
        let mut indices = KeyIndex::default();
        Grouped::from_cursor(self.cursor.flat_map(move |(key, value), _| {
            let index = indices.next_index(&key);
            (func)(&key, value, index)
                .into_iter()
                .map(move |value| (key.clone(), value))
        }))
    }

    /// Reduces the values of each key, seeding each key's accumulator with its first value.
    ///
    /// The first value a key reduces with therefore has per-key index `1`.
    pub fn reduce<Func>(self, mut func: Func) -> Reduced<K, V>
    where
        Func: FnMut(&K, V, V, usize) -> V,
    {
        let mut cursor = self.cursor;
        let mut table = KeyTable::default();
        while let Some((key, value)) = cursor.pull() {
            let (index, slot) = table.visit(&key, |_| None);
            let accum = match slot.take() {
                Some(accum) => (func)(&key, accum, value, index),
                None => value,
            };
            *slot = Some(accum);
        }
        Reduced::from_map(
            table
                .into_states()
                .into_iter()
                .filter_map(|(key, accum)| Some((key, accum?)))
                .collect(),
        )
    }

    /// Folds the values of each key, starting every key from a clone of `init`.
    pub fn fold<Accum, Func>(self, init: Accum, func: Func) -> Reduced<K, Accum>
    where
        Accum: Clone,
        Func: FnMut(&K, Accum, V, usize) -> Accum,
    {
        self.fold_with(move |_| init.clone(), func)
    }

    /// Folds the values of each key, starting from `init(&key)`.
    ///
    /// `init` is called once per key, when that key is first seen.
    pub fn fold_with<Accum, Init, Func>(self, mut init: Init, mut func: Func) -> Reduced<K, Accum>
    where
        Init: FnMut(&K) -> Accum,
        Func: FnMut(&K, Accum, V, usize) -> Accum,
    {
        let mut cursor = self.cursor;
        let mut table = KeyTable::default();
        while let Some((key, value)) = cursor.pull() {
            let (index, slot) = table.visit(&key, |key| Some((init)(key)));
            if let Some(accum) = slot.take() {
                *slot = Some((func)(&key, accum, value, index));
            }
        }
        Reduced::from_map(
            table
                .into_states()
                .into_iter()
                .filter_map(|(key, accum)| Some((key, accum?)))
                .collect(),
        )
    }

    /// Lazily discards the first `n` values of each key.
    #[doc(alias = "drop")]
    pub fn skip(self, n: usize) -> Grouped<impl Pull<Item = (K, V)>> {
        self.filter(move |_, _, index| n <= index)
    }

    /// Lazily keeps at most the first `n` values of each key.
    ///
    /// Unlike [`Cursor::take`], this cannot stop early since a new key may still arrive.
    pub fn take(self, n: usize) -> Grouped<impl Pull<Item = (K, V)>> {
        self.filter(move |_, _, index| index < n)
    }

    /// Returns, per key, the first value passing `pred`, or `None` for keys without a match.
    ///
    /// `pred` is not called again for a key once it matched.
    pub fn find<Func>(self, mut pred: Func) -> Reduced<K, Option<V>>
    where
        Func: FnMut(&K, &V, usize) -> bool,
    {
        let mut cursor = self.cursor;
        let mut table = KeyTable::default();
        while let Some((key, value)) = cursor.pull() {
            let (index, found) = table.visit(&key, |_| None);
            if found.is_none() && (pred)(&key, &value, index) {
                *found = Some(value);
            }
        }
        Reduced::from_map(table.into_states())
    }

    /// Lazily pairs each value with its per-key index.
    pub fn enumerate(self) -> Grouped<impl Pull<Item = (K, (usize, V))>> {
        self.map(|_, value, index| (index, value))
    }

    /// Lazily drops values equal to an earlier value of the same key.
    pub fn unique(self) -> Grouped<impl Pull<Item = (K, V)>>
    where
        V: Eq + Hash + Clone,
    {
        let mut table = KeyTable::default();
        Grouped::from_cursor(self.cursor.filter(move |(key, value), _| {
            let (_, seen) = table.visit(key, |_| FxHashSet::default());
            seen.insert(value.clone())
        }))
    }

    /// Returns the number of values per key.
    pub fn count(self) -> Reduced<K, usize> {
        self.fold(0, |_, count, _, _| count + 1)
    }

    /// Drains the view, calling `func` with each key, value and per-key index.
    pub fn for_each<Func>(self, mut func: Func)
    where
        Func: FnMut(&K, V, usize),
    {
        let mut cursor = self.cursor;
        let mut indices = KeyIndex::default();
        while let Some((key, value)) = cursor.pull() {
            let index = indices.next_index(&key);
            let () = (func)(&key, value, index);
        }
    }

    /// Lazily re-keys every pair with `func(&old_key, &value, index_within_old_key)`.
    ///
    /// The returned view starts fresh per-key indices for the new keys.
    pub fn reorganize_by<KeyOut, Func>(
        self,
        mut func: Func,
    ) -> Grouped<impl Pull<Item = (KeyOut, V)>>
    where
        KeyOut: Eq + Hash + Clone,
        Func: FnMut(&K, &V, usize) -> KeyOut,
    {
        let mut indices = KeyIndex::default();
        Grouped::from_cursor(self.cursor.map(move |(key, value), _| {
            let index = indices.next_index(&key);
            ((func)(&key, &value, index), value)
        }))
    }

    /// Lazily yields each distinct key, in first-seen order.
    pub fn keys(self) -> Cursor<impl Pull<Item = K>> {
        self.cursor.map(|(key, _), _| key).unique()
    }

    /// Lazily yields the values, in source order.
    pub fn values(self) -> Cursor<impl Pull<Item = V>> {
        self.cursor.map(|(_, value), _| value)
    }

    /// Returns the underlying cursor of `(key, value)` pairs.
    #[doc(alias = "entries")]
    pub fn items(self) -> Cursor<P> {
        self.cursor
    }

    /// Drains the view into per-key value lists, in first-seen key order.
    pub fn to_map(self) -> IndexMap<K, Vec<V>> {
        group_pairs(self.cursor)
    }

    /// Drains the view into per-key value lists, dropping the keys.
    #[doc(alias = "to_array")]
    pub fn to_vec(self) -> Vec<Vec<V>> {
        self.to_map().into_values().collect()
    }

    /// Drains the view into a JSON object of per-key value arrays, keyed by each key's
    /// [`Display`](std::fmt::Display) form.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn to_object(self) -> Result<serde_json::Map<String, serde_json::Value>, crate::Error>
    where
        K: std::fmt::Display,
        V: serde::Serialize,
    {
        crate::materialize::to_object(self.to_map())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parity(x: &i32) -> &'static str {
        if x % 2 == 0 { "even" } else { "odd" }
    }

    #[test]
    fn test_enumerate_per_key() {
        let map = Cursor::new([-3, 0, 2, -1, 3])
            .group_by(|x, _| parity(x))
            .enumerate()
            .to_map();
        assert_eq!(vec![(0, -3), (1, -1), (2, 3)], map["odd"]);
        assert_eq!(vec![(0, 0), (1, 2)], map["even"]);
    }

    #[test]
    fn test_every_settles_per_key() {
        let mut calls = 0;
        let every = Grouped::new([("a", 1), ("b", 2), ("a", -1), ("a", 5), ("b", 4)]).every(
            |_, value, _| {
                calls += 1;
                0 < *value
            },
        );
        assert_eq!(Some(&false), every.get(&"a"));
        assert_eq!(Some(&true), every.get(&"b"));
        // "a" settles on its second value, so its third is never checked.
        assert_eq!(4, calls);
    }

    #[test]
    fn test_fold_with_per_key_init() {
        let mut inits = Vec::new();
        let folded = Grouped::new([(2, 1), (3, 1), (2, 1)]).fold_with(
            |key| {
                inits.push(*key);
                key * 100
            },
            |_, accum, value, _| accum + value,
        );
        assert_eq!(vec![2, 3], inits);
        assert_eq!(vec![(2, 202), (3, 301)], folded.into_iter().collect::<Vec<_>>());
    }
}
