//! [`AsyncGrouped`], the asynchronous keyed aggregation view.
use std::future::ready;
use std::hash::Hash;
use std::pin::{Pin, pin};

use futures::stream::{self, Stream, StreamExt};
use indexmap::IndexMap;
use pin_project_lite::pin_project;
use rustc_hash::FxHashSet;

use super::AsyncCursor;
use crate::Reduced;
use crate::key_table::{KeyIndex, KeyTable};
use crate::materialize::push_grouped;

pin_project! {
    /// A lazy view over a stream of `(key, value)` pairs which applies combinators
    /// independently per key, like [`Grouped`](crate::Grouped).
    ///
    /// Callbacks receive the key, the value and its per-key index, and return futures which
    /// are awaited one at a time in source order. Keyed terminals resolve to the same
    /// [`Reduced`] view as the synchronous ones.
    ///
    /// ```rust
    /// use std::future::ready;
    ///
    /// use pullerator::AsyncCursor;
    ///
    /// # futures::executor::block_on(async {
    /// let counts = AsyncCursor::from_sequence(["apple", "avocado", "banana", "apricot"])
    ///     .group_by(|word, _| ready(word.chars().next()))
    ///     .count()
    ///     .await;
    /// assert_eq!(Some(&3), counts.get(&Some('a')));
    /// assert_eq!(Some(&1), counts.get(&Some('b')));
    /// # });
    /// ```
    #[must_use = "streams do nothing unless polled"]
    pub struct AsyncGrouped<St> {
        #[pin]
        cursor: AsyncCursor<St>,
    }
}

impl<I, K, V> AsyncGrouped<stream::Iter<I>>
where
    I: Iterator<Item = (K, V)>,
    K: Eq + Hash + Clone,
{
    /// Creates a view over a sequence of pairs.
    pub fn from_sequence(pairs: impl IntoIterator<IntoIter = I>) -> Self {
        Self::from_cursor(AsyncCursor::from_sequence(pairs))
    }
}

impl<St, K, V> AsyncGrouped<St>
where
    St: Stream<Item = (K, V)>,
    K: Eq + Hash + Clone,
{
    /// Creates a view over a stream of pairs.
    pub fn new(stream: St) -> Self {
        Self::from_cursor(AsyncCursor::new(stream))
    }

    /// Creates a view over a cursor of pairs.
    pub fn from_cursor(cursor: AsyncCursor<St>) -> Self {
        Self { cursor }
    }

    /// Drops the underlying stream early.
    pub fn close(self: Pin<&mut Self>) {
        self.project().cursor.close();
    }

    /// Returns, per key, whether every value passes `pred`. A key settles at its first
    /// failure and `pred` is not awaited for it again.
    pub async fn every<Func, Fut>(self, mut pred: Func) -> Reduced<K, bool>
    where
        Func: FnMut(&K, &V, usize) -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut cursor = pin!(self.cursor);
        let mut table = KeyTable::default();
        while let Some((key, value)) = cursor.next().await {
            let (index, passed) = table.visit(&key, |_| true);
            if *passed {
                *passed = (pred)(&key, &value, index).await;
            }
        }
        Reduced::from_map(table.into_states())
    }

    /// Returns, per key, whether any value passes `pred`. A key settles at its first success.
    pub async fn some<Func, Fut>(self, mut pred: Func) -> Reduced<K, bool>
    where
        Func: FnMut(&K, &V, usize) -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut cursor = pin!(self.cursor);
        let mut table = KeyTable::default();
        while let Some((key, value)) = cursor.next().await {
            let (index, passed) = table.visit(&key, |_| false);
            if !*passed {
                *passed = (pred)(&key, &value, index).await;
            }
        }
        Reduced::from_map(table.into_states())
    }

    /// Lazily keeps the pairs passing the async `pred`.
    pub fn filter<Func, Fut>(self, mut pred: Func) -> AsyncGrouped<impl Stream<Item = (K, V)>>
    where
        Func: FnMut(&K, &V, usize) -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut indices = KeyIndex::default();
        AsyncGrouped::from_cursor(self.cursor.filter(move |(key, value), _| {
            let index = indices.next_index(key);
            (pred)(key, value, index)
        }))
    }

    /// Lazily maps each value with the async `func`, keeping its key.
    pub fn map<Func, Fut>(
        self,
        mut func: Func,
    ) -> AsyncGrouped<impl Stream<Item = (K, Fut::Output)>>
    where
        Func: FnMut(&K, V, usize) -> Fut,
        Fut: Future,
    {
        let mut indices = KeyIndex::default();
        AsyncGrouped::from_cursor(self.cursor.map(move |(key, value), _| {
            let index = indices.next_index(&key);
            let value = (func)(&key, value, index);
            async move { (key, value.await) }
        }))
    }

    /// Lazily maps each value to an iterable and flattens it one level under the same key.
    pub fn flat_map<Func, Fut, IntoIter>(
        self,
        mut func: Func,
    ) -> AsyncGrouped<impl Stream<Item = (K, IntoIter::Item)>>
    where
        Func: FnMut(&K, V, usize) -> Fut,
        Fut: Future<Output = IntoIter>,
        IntoIter: IntoIterator,
    {
        let mut indices = KeyIndex::default();
        AsyncGrouped::from_cursor(self.cursor.flat_map(move |(key, value), _| {
            let index = indices.next_index(&key);
            let values = (func)(&key, value, index);
            async move {
                values
                    .await
                    .into_iter()
                    .map(move |value| (key.clone(), value))
            }
        }))
    }

    /// Reduces the values of each key, seeding each key's accumulator with its first value.
    pub async fn reduce<Func, Fut>(self, mut func: Func) -> Reduced<K, V>
    where
        Func: FnMut(&K, V, V, usize) -> Fut,
        Fut: Future<Output = V>,
    {
        let mut cursor = pin!(self.cursor);
        let mut table = KeyTable::default();
        while let Some((key, value)) = cursor.next().await {
            let (index, slot) = table.visit(&key, |_| None);
            let accum = match slot.take() {
                Some(accum) => (func)(&key, accum, value, index).await,
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
    pub async fn fold<Accum, Func, Fut>(self, init: Accum, func: Func) -> Reduced<K, Accum>
    where
        Accum: Clone,
        Func: FnMut(&K, Accum, V, usize) -> Fut,
        Fut: Future<Output = Accum>,
    {
        self.fold_with(move |_| init.clone(), func).await
    }

    /// Folds the values of each key, starting from `init(&key)`.
    ///
    /// `init` is a plain function, called once per key when that key is first seen.
    pub async fn fold_with<Accum, Init, Func, Fut>(
        self,
        mut init: Init,
        mut func: Func,
    ) -> Reduced<K, Accum>
    where
        Init: FnMut(&K) -> Accum,
        Func: FnMut(&K, Accum, V, usize) -> Fut,
        Fut: Future<Output = Accum>,
    {
        let mut cursor = pin!(self.cursor);
        let mut table = KeyTable::default();
        while let Some((key, value)) = cursor.next().await {
            let (index, slot) = table.visit(&key, |key| Some((init)(key)));
            if let Some(accum) = slot.take() {
                *slot = Some((func)(&key, accum, value, index).await);
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
    pub fn skip(self, n: usize) -> AsyncGrouped<impl Stream<Item = (K, V)>> {
        self.filter(move |_, _, index| ready(n <= index))
    }

    /// Lazily keeps at most the first `n` values of each key.
    pub fn take(self, n: usize) -> AsyncGrouped<impl Stream<Item = (K, V)>> {
        self.filter(move |_, _, index| ready(index < n))
    }

    /// Returns, per key, the first value passing `pred`, or `None` for keys without a match.
    pub async fn find<Func, Fut>(self, mut pred: Func) -> Reduced<K, Option<V>>
    where
        Func: FnMut(&K, &V, usize) -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut cursor = pin!(self.cursor);
        let mut table = KeyTable::default();
        while let Some((key, value)) = cursor.next().await {
            let (index, found) = table.visit(&key, |_| None);
            if found.is_none() && (pred)(&key, &value, index).await {
                *found = Some(value);
            }
        }
        Reduced::from_map(table.into_states())
    }

    /// Lazily pairs each value with its per-key index.
    pub fn enumerate(self) -> AsyncGrouped<impl Stream<Item = (K, (usize, V))>> {
        self.map(|_, value, index| ready((index, value)))
    }

    /// Lazily drops values equal to an earlier value of the same key.
    pub fn unique(self) -> AsyncGrouped<impl Stream<Item = (K, V)>>
    where
        V: Eq + Hash + Clone,
    {
        let mut table = KeyTable::default();
        AsyncGrouped::from_cursor(self.cursor.filter(move |(key, value), _| {
            let (_, seen) = table.visit(key, |_| FxHashSet::default());
            ready(seen.insert(value.clone()))
        }))
    }

    /// Returns the number of values per key.
    pub async fn count(self) -> Reduced<K, usize> {
        self.fold(0, |_, count, _, _| ready(count + 1)).await
    }

    /// Drains the view, awaiting `func` with each key, value and per-key index.
    pub async fn for_each<Func, Fut>(self, mut func: Func)
    where
        Func: FnMut(&K, V, usize) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut cursor = pin!(self.cursor);
        let mut indices = KeyIndex::default();
        while let Some((key, value)) = cursor.next().await {
            let index = indices.next_index(&key);
            let () = (func)(&key, value, index).await;
        }
    }

    /// Lazily re-keys every pair with the awaited
    /// `func(&old_key, &value, index_within_old_key)`.
    pub fn reorganize_by<KeyOut, Func, Fut>(
        self,
        mut func: Func,
    ) -> AsyncGrouped<impl Stream<Item = (KeyOut, V)>>
    where
        KeyOut: Eq + Hash + Clone,
        Func: FnMut(&K, &V, usize) -> Fut,
        Fut: Future<Output = KeyOut>,
    {
        let mut indices = KeyIndex::default();
        AsyncGrouped::from_cursor(self.cursor.map(move |(key, value), _| {
            let index = indices.next_index(&key);
            let key_out = (func)(&key, &value, index);
            async move { (key_out.await, value) }
        }))
    }

    /// Lazily yields each distinct key, in first-seen order.
    pub fn keys(self) -> AsyncCursor<impl Stream<Item = K>> {
        self.cursor.map(|(key, _), _| ready(key)).unique()
    }

    /// Lazily yields the values, in source order.
    pub fn values(self) -> AsyncCursor<impl Stream<Item = V>> {
        self.cursor.map(|(_, value), _| ready(value))
    }

    /// Returns the underlying cursor of `(key, value)` pairs.
    #[doc(alias = "entries")]
    pub fn items(self) -> AsyncCursor<St> {
        self.cursor
    }

    /// Drains the view into per-key value lists, in first-seen key order.
    pub async fn to_map(self) -> IndexMap<K, Vec<V>> {
        let mut cursor = pin!(self.cursor);
        let mut groups = IndexMap::new();
        while let Some((key, value)) = cursor.next().await {
            push_grouped(&mut groups, key, value);
        }
        groups
    }

    /// Drains the view into per-key value lists, dropping the keys.
    #[doc(alias = "to_array")]
    pub async fn to_vec(self) -> Vec<Vec<V>> {
        self.to_map().await.into_values().collect()
    }

    /// Drains the view into a JSON object of per-key value arrays, keyed by each key's
    /// [`Display`](std::fmt::Display) form.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub async fn to_object(
        self,
    ) -> Result<serde_json::Map<String, serde_json::Value>, crate::Error>
    where
        K: std::fmt::Display,
        V: serde::Serialize,
    {
        crate::materialize::to_object(self.to_map().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parity(x: &i32) -> &'static str {
        if x % 2 == 0 { "even" } else { "odd" }
    }

    #[tokio::test]
    async fn test_reduce_per_key() {
        let sums = AsyncCursor::from_sequence([-3, -1, 0, 2, 3, 5, 6, 8])
            .group_by(|x, _| ready(parity(x)))
            .reduce(|_, acc, x, _| async move { acc + x })
            .await;
        assert_eq!(Some(&4), sums.get(&"odd"));
        assert_eq!(Some(&16), sums.get(&"even"));
    }

    #[tokio::test]
    async fn test_every_settles_per_key() {
        let mut calls = 0;
        let pairs = [("a", 1), ("b", 2), ("a", -1), ("a", 5), ("b", 4)];
        let every = AsyncGrouped::from_sequence(pairs)
            .every(|_, value, _| {
                calls += 1;
                ready(0 < *value)
            })
            .await;
        assert_eq!(Some(&false), every.get(&"a"));
        assert_eq!(Some(&true), every.get(&"b"));
        assert_eq!(4, calls);
    }

    #[tokio::test]
    async fn test_flat_map_keeps_key() {
        let map = AsyncGrouped::from_sequence([("x", 2), ("y", 1), ("x", 0)])
            .flat_map(|_, n, index| async move { vec![index; n] })
            .to_map()
            .await;
        assert_eq!(vec![0, 0], map["x"]);
        assert_eq!(vec![0], map["y"]);
    }
}
