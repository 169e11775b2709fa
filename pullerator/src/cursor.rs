//! [`Cursor`], the synchronous combinator engine.
use std::hash::Hash;

use crate::enumerate::Enumerate;
use crate::filter::Filter;
use crate::flat_map::FlatMap;
use crate::map::Map;
use crate::skip::Skip;
use crate::take::Take;
use crate::unique::Unique;
use crate::{Error, FnSource, Grouped, IterSource, Pull};

/// A lazy pull cursor with a chainable combinator vocabulary.
///
/// Combinators (`filter`, `map`, `take`, ...) consume the cursor and wrap its source in a new
/// adaptor without pulling anything. Terminals (`to_vec`, `reduce`, `find`, ...) drive the
/// chain, pulling only as much as their result needs.
///
/// ```rust
/// use pullerator::Cursor;
///
/// let squares = Cursor::new(1..)
///     .filter(|x, _| x % 2 == 1)
///     .map(|x, _| x * x)
///     .take(3)
///     .to_vec();
/// assert_eq!(vec![1, 9, 25], squares);
/// ```
///
/// A cursor has a single owner. Deriving two views from one cursor does not compile:
///
/// ```rust,compile_fail
/// use pullerator::Cursor;
///
/// let cursor = Cursor::new(0..10);
/// let evens = cursor.filter(|x, _| x % 2 == 0);
/// let odds = cursor.filter(|x, _| x % 2 == 1);
/// ```
///
/// Sharing is spelled out with [`Cursor::by_ref`], and pulling from the borrowed view consumes
/// the original:
///
/// ```rust
/// use pullerator::Cursor;
///
/// let mut cursor = Cursor::new(1..=5);
/// assert_eq!(vec![1, 2], cursor.by_ref().take(2).to_vec());
/// assert_eq!(vec![3, 4, 5], cursor.to_vec());
/// ```
#[must_use = "cursors do nothing unless pulled"]
pub struct Cursor<P> {
    source: P,
}

impl<I> Cursor<IterSource<I>>
where
    I: Iterator,
{
    /// Creates a cursor over a sequence.
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self::from_pull(IterSource::new(iter))
    }
}

impl<Func, IntoIter> Cursor<FnSource<Func, IntoIter>>
where
    Func: FnOnce() -> IntoIter,
    IntoIter: IntoIterator,
{
    /// Creates a cursor over whatever `func` returns. `func` is called on the first pull.
    pub fn from_fn(func: Func) -> Self {
        Self::from_pull(FnSource::new(func))
    }
}

impl<P> Cursor<P>
where
    P: Pull,
{
    /// Creates a cursor over a custom [`Pull`] source.
    pub fn from_pull(source: P) -> Self {
        Self { source }
    }

    /// Unwraps the underlying source.
    pub fn into_inner(self) -> P {
        self.source
    }

    /// Borrows this cursor as a new cursor. Everything pulled through the borrow is consumed
    /// from `self`, and closing the borrow closes `self`.
    pub fn by_ref(&mut self) -> Cursor<&mut P> {
        Cursor {
            source: &mut self.source,
        }
    }

    /// Releases the source early, forwarding the close through every adaptor.
    pub fn close(&mut self) {
        self.source.close();
    }

    /// Injects `error` at the current position, see [`Pull::throw`].
    pub fn throw(&mut self, error: Error) -> Result<Option<P::Item>, Error> {
        tracing::debug!(%error, "Throwing error into cursor.");
        self.source.throw(error)
    }

    /// Returns `true` if every item passes `pred(&item, index)`. Stops and closes the cursor at
    /// the first failure.
    pub fn every<Func>(mut self, mut pred: Func) -> bool
    where
        Func: FnMut(&P::Item, usize) -> bool,
    {
        let mut index = 0;
        while let Some(item) = self.source.pull() {
            if !(pred)(&item, index) {
                self.source.close();
                return false;
            }
            index += 1;
        }
        true
    }

    /// Returns `true` if any item passes `pred(&item, index)`. Stops and closes the cursor at the
    /// first success.
    pub fn some<Func>(mut self, mut pred: Func) -> bool
    where
        Func: FnMut(&P::Item, usize) -> bool,
    {
        let mut index = 0;
        while let Some(item) = self.source.pull() {
            if (pred)(&item, index) {
                self.source.close();
                return true;
            }
            index += 1;
        }
        false
    }

    /// Lazily keeps the items passing `pred(&item, index)`, where `index` is the item's
    /// position in this cursor.
    pub fn filter<Func>(self, pred: Func) -> Cursor<Filter<P, Func>>
    where
        Func: FnMut(&P::Item, usize) -> bool,
    {
        Cursor::from_pull(Filter::new(self.source, pred))
    }

    /// Lazily maps each item with `func(item, index)`.
    pub fn map<Func, ItemOut>(self, func: Func) -> Cursor<Map<P, Func>>
    where
        Func: FnMut(P::Item, usize) -> ItemOut,
    {
        Cursor::from_pull(Map::new(self.source, func))
    }

    /// Lazily maps each item to an iterable with `func(item, index)` and flattens one level.
    pub fn flat_map<Func, IntoIter>(self, func: Func) -> Cursor<FlatMap<P, Func, IntoIter>>
    where
        Func: FnMut(P::Item, usize) -> IntoIter,
        IntoIter: IntoIterator,
    {
        Cursor::from_pull(FlatMap::new(self.source, func))
    }

    /// Combines all items with `func(accum, item, index)`, seeding the accumulator with the
    /// first item. The first item combined therefore has index `1`.
    ///
    /// Returns [`Error::EmptyReduce`] if the cursor is empty.
    pub fn reduce<Func>(mut self, mut func: Func) -> Result<P::Item, Error>
    where
        Func: FnMut(P::Item, P::Item, usize) -> P::Item,
    {
        let Some(mut accum) = self.source.pull() else {
            tracing::debug!("Reduce of an empty cursor.");
            return Err(Error::EmptyReduce);
        };
        let mut index = 1;
        while let Some(item) = self.source.pull() {
            accum = (func)(accum, item, index);
            index += 1;
        }
        Ok(accum)
    }

    /// Combines all items with `func(accum, item, index)`, starting from `init` at index `0`.
    /// An empty cursor returns `init`.
    pub fn fold<Accum, Func>(mut self, init: Accum, mut func: Func) -> Accum
    where
        Func: FnMut(Accum, P::Item, usize) -> Accum,
    {
        let mut accum = init;
        let mut index = 0;
        while let Some(item) = self.source.pull() {
            accum = (func)(accum, item, index);
            index += 1;
        }
        accum
    }

    /// Lazily discards the first `n` items.
    #[doc(alias = "drop")]
    pub fn skip(self, n: usize) -> Cursor<Skip<P>> {
        Cursor::from_pull(Skip::new(self.source, n))
    }

    /// Lazily yields at most `n` items, leaving the rest in the source.
    pub fn take(self, n: usize) -> Cursor<Take<P>> {
        Cursor::from_pull(Take::new(self.source, n))
    }

    /// Returns the first item passing `pred(&item, index)`, pulling nothing after it, then
    /// closes the cursor.
    pub fn find<Func>(mut self, mut pred: Func) -> Option<P::Item>
    where
        Func: FnMut(&P::Item, usize) -> bool,
    {
        let mut index = 0;
        while let Some(item) = self.source.pull() {
            if (pred)(&item, index) {
                self.source.close();
                return Some(item);
            }
            index += 1;
        }
        None
    }

    /// Lazily pairs each item with its zero-based position.
    pub fn enumerate(self) -> Cursor<Enumerate<P>> {
        Cursor::from_pull(Enumerate::new(self.source))
    }

    /// Lazily drops items equal to an earlier item.
    pub fn unique(self) -> Cursor<Unique<P>>
    where
        P::Item: Eq + Hash + Clone,
    {
        Cursor::from_pull(Unique::new(self.source))
    }

    /// Drains the cursor, returning the number of items.
    pub fn count(mut self) -> usize {
        let mut count = 0;
        while self.source.pull().is_some() {
            count += 1;
        }
        count
    }

    /// Drains the cursor, calling `func(item, index)` on each item.
    pub fn for_each<Func>(self, mut func: Func)
    where
        Func: FnMut(P::Item, usize),
    {
        self.fold((), |(), item, index| (func)(item, index));
    }

    /// Drains the cursor, calling the fallible `func(item, index)` on each item. Stops at, and
    /// returns, the first error, leaving the rest of the source unpulled.
    pub fn try_for_each<Func, E>(mut self, mut func: Func) -> Result<(), E>
    where
        Func: FnMut(P::Item, usize) -> Result<(), E>,
    {
        let mut index = 0;
        while let Some(item) = self.source.pull() {
            (func)(item, index)?;
            index += 1;
        }
        Ok(())
    }

    /// Lazily groups items by `key_fn(&item, index)` into a [`Grouped`] view.
    pub fn group_by<Key, Func>(self, mut key_fn: Func) -> Grouped<impl Pull<Item = (Key, P::Item)>>
    where
        Key: Eq + Hash + Clone,
        Func: FnMut(&P::Item, usize) -> Key,
    {
        Grouped::from_cursor(self.map(move |item, index| ((key_fn)(&item, index), item)))
    }

    /// Drains the cursor into a [`Vec`].
    #[doc(alias = "to_array")]
    pub fn to_vec(mut self) -> Vec<P::Item> {
        let mut items = Vec::new();
        while let Some(item) = self.source.pull() {
            items.push(item);
        }
        items
    }
}

impl<P> Pull for Cursor<P>
where
    P: Pull,
{
    type Item = P::Item;

    fn pull(&mut self) -> Option<Self::Item> {
        self.source.pull()
    }

    fn close(&mut self) {
        self.source.close();
    }

    fn throw(&mut self, error: Error) -> Result<Option<Self::Item>, Error> {
        self.source.throw(error)
    }
}

impl<P> Iterator for Cursor<P>
where
    P: Pull,
{
    type Item = P::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.source.pull()
    }
}
