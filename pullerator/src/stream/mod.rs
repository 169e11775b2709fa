//! [`AsyncCursor`] and [`AsyncGrouped`], the [`Stream`] counterparts of
//! [`Cursor`](crate::Cursor) and [`Grouped`](crate::Grouped).
//!
//! Both expose the same vocabulary as their synchronous twins, with two differences:
//! callbacks return futures, and terminals are `async fn`s. There is no `throw`: a [`Stream`]
//! has no channel to push an error back upstream, so fallible sources yield `Result` items
//! instead, typically drained with [`AsyncCursor::try_for_each`].
use std::hash::Hash;
use std::pin::{Pin, pin};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, ready};

use futures::stream::{self, FusedStream, Stream, StreamExt};
use pin_project_lite::pin_project;

use crate::Error;

pub mod enumerate;
pub mod filter;
pub mod flat_map;
pub mod grouped;
pub mod lazy;
pub mod map;
pub mod skip;
pub mod take;
pub mod unique;

pub use grouped::AsyncGrouped;
pub use lazy::LazySource;

use self::enumerate::Enumerate;
use self::filter::Filter;
use self::flat_map::FlatMap;
use self::map::Map;
use self::skip::Skip;
use self::take::Take;
use self::unique::Unique;

/// Raised when a borrowing cursor is closed, so the borrowed cursor closes too.
#[derive(Clone, Debug, Default)]
struct CloseSignal(Arc<AtomicBool>);

impl CloseSignal {
    fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pin_project! {
    #[project = CursorStateProj]
    enum CursorState<St> {
        Open {
            #[pin]
            stream: St,
        },
        Closed,
    }
}

pin_project! {
    /// A lazy, fused stream cursor with a chainable combinator vocabulary.
    ///
    /// ```rust
    /// use pullerator::AsyncCursor;
    ///
    /// # futures::executor::block_on(async {
    /// let squares = AsyncCursor::from_sequence(1..)
    ///     .filter(|x, _| std::future::ready(x % 2 == 1))
    ///     .map(|x, _| async move { x * x })
    ///     .take(3)
    ///     .to_vec()
    ///     .await;
    /// assert_eq!(vec![1, 9, 25], squares);
    /// # });
    /// ```
    ///
    /// Terminals pin the cursor internally. To drive only part of a cursor and keep the rest,
    /// pin it and borrow it with [`AsyncCursor::by_ref`].
    #[must_use = "streams do nothing unless polled"]
    pub struct AsyncCursor<St> {
        #[pin]
        state: CursorState<St>,
        // Signals of every borrowed cursor upstream, raised on close.
        upstream: Vec<CloseSignal>,
        // Raised once a borrow of this cursor is closed.
        borrowed: Option<CloseSignal>,
    }
}

impl<I> AsyncCursor<stream::Iter<I>>
where
    I: Iterator,
{
    /// Creates a cursor over a sequence, yielding each item without suspending.
    pub fn from_sequence(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self::new(stream::iter(iter))
    }
}

impl<Func, Fut, St> AsyncCursor<LazySource<Func, Fut, St>>
where
    Func: FnOnce() -> Fut,
    Fut: Future<Output = St>,
    St: Stream,
{
    /// Creates a cursor over the stream `func` resolves to. `func` is called, and its future
    /// awaited, on the first poll.
    pub fn from_fn(func: Func) -> Self {
        Self::new(LazySource::new(func))
    }
}

impl<St> AsyncCursor<St>
where
    St: Stream,
{
    /// Creates a cursor over `stream`.
    pub fn new(stream: St) -> Self {
        Self {
            state: CursorState::Open { stream },
            upstream: Vec::new(),
            borrowed: None,
        }
    }

    /// Wraps `self` in the adaptor built by `make`, keeping the close signals of the cursors
    /// it borrows from.
    fn chain<Next>(self, make: impl FnOnce(Self) -> Next) -> AsyncCursor<Next> {
        let upstream = self.upstream.clone();
        AsyncCursor {
            state: CursorState::Open {
                stream: (make)(self),
            },
            upstream,
            borrowed: None,
        }
    }

    /// Borrows this pinned cursor as a new cursor. Everything polled through the borrow is
    /// consumed from `self`, and closing the borrow, or any cursor chained from it, closes
    /// `self`.
    pub fn by_ref(mut self: Pin<&mut Self>) -> AsyncCursor<Pin<&mut Self>> {
        let mut upstream = self.upstream.clone();
        let signal = self
            .as_mut()
            .project()
            .borrowed
            .get_or_insert_with(CloseSignal::default)
            .clone();
        upstream.push(signal);
        AsyncCursor {
            state: CursorState::Open { stream: self },
            upstream,
            borrowed: None,
        }
    }

    /// Drops the underlying stream early, along with any cursor this one borrows from. The
    /// cursor yields nothing afterwards.
    pub fn close(self: Pin<&mut Self>) {
        let this = self.project();
        for signal in this.upstream.iter() {
            signal.raise();
        }
        let mut state = this.state;
        if let CursorStateProj::Open { .. } = state.as_mut().project() {
            tracing::trace!("Closing stream cursor.");
            state.set(CursorState::Closed);
        }
    }

    /// Returns `true` if every item passes `pred(&item, index)`. Stops and closes the cursor at
    /// the first failure.
    pub async fn every<Func, Fut>(self, mut pred: Func) -> bool
    where
        Func: FnMut(&St::Item, usize) -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut this = pin!(self);
        let mut index = 0;
        while let Some(item) = this.next().await {
            let passed = (pred)(&item, index).await;
            index += 1;
            if !passed {
                this.as_mut().close();
                return false;
            }
        }
        true
    }

    /// Returns `true` if any item passes `pred(&item, index)`. Stops and closes the cursor at
    /// the first success.
    pub async fn some<Func, Fut>(self, mut pred: Func) -> bool
    where
        Func: FnMut(&St::Item, usize) -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut this = pin!(self);
        let mut index = 0;
        while let Some(item) = this.next().await {
            let passed = (pred)(&item, index).await;
            index += 1;
            if passed {
                this.as_mut().close();
                return true;
            }
        }
        false
    }

    /// Lazily keeps the items passing the async `pred(&item, index)`.
    pub fn filter<Func, Fut>(self, pred: Func) -> AsyncCursor<Filter<Self, Func, Fut>>
    where
        Func: FnMut(&St::Item, usize) -> Fut,
        Fut: Future<Output = bool>,
    {
        self.chain(|this| Filter::new(this, pred))
    }

    /// Lazily maps each item with the async `func(item, index)`.
    pub fn map<Func, Fut>(self, func: Func) -> AsyncCursor<Map<Self, Func, Fut>>
    where
        Func: FnMut(St::Item, usize) -> Fut,
        Fut: Future,
    {
        self.chain(|this| Map::new(this, func))
    }

    /// Lazily maps each item to an iterable with the async `func` and flattens one level.
    pub fn flat_map<Func, Fut, IntoIter>(
        self,
        func: Func,
    ) -> AsyncCursor<FlatMap<Self, Func, Fut, IntoIter>>
    where
        Func: FnMut(St::Item, usize) -> Fut,
        Fut: Future<Output = IntoIter>,
        IntoIter: IntoIterator,
    {
        self.chain(|this| FlatMap::new(this, func))
    }

    /// Combines all items with `func(accum, item, index)`, seeding the accumulator with the
    /// first item, so the first call sees index 1.
    ///
    /// Returns [`Error::EmptyReduce`] if the cursor is empty.
    pub async fn reduce<Func, Fut>(self, mut func: Func) -> Result<St::Item, Error>
    where
        Func: FnMut(St::Item, St::Item, usize) -> Fut,
        Fut: Future<Output = St::Item>,
    {
        let mut this = pin!(self);
        let Some(mut accum) = this.next().await else {
            tracing::debug!("Reduce of an empty stream cursor.");
            return Err(Error::EmptyReduce);
        };
        let mut index = 1;
        while let Some(item) = this.next().await {
            accum = (func)(accum, item, index).await;
            index += 1;
        }
        Ok(accum)
    }

    /// Combines all items with `func(accum, item, index)`, starting from `init`. An empty
    /// cursor returns `init`.
    pub async fn fold<Accum, Func, Fut>(self, init: Accum, mut func: Func) -> Accum
    where
        Func: FnMut(Accum, St::Item, usize) -> Fut,
        Fut: Future<Output = Accum>,
    {
        let mut this = pin!(self);
        let mut accum = init;
        let mut index = 0;
        while let Some(item) = this.next().await {
            accum = (func)(accum, item, index).await;
            index += 1;
        }
        accum
    }

    /// Lazily discards the first `n` items.
    #[doc(alias = "drop")]
    pub fn skip(self, n: usize) -> AsyncCursor<Skip<Self>> {
        self.chain(|this| Skip::new(this, n))
    }

    /// Lazily yields at most `n` items, leaving the rest in the stream.
    pub fn take(self, n: usize) -> AsyncCursor<Take<Self>> {
        self.chain(|this| Take::new(this, n))
    }

    /// Returns the first item passing `pred(&item, index)`, polling nothing after it, then
    /// closes the cursor.
    pub async fn find<Func, Fut>(self, mut pred: Func) -> Option<St::Item>
    where
        Func: FnMut(&St::Item, usize) -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut this = pin!(self);
        let mut index = 0;
        while let Some(item) = this.next().await {
            let found = (pred)(&item, index).await;
            index += 1;
            if found {
                this.as_mut().close();
                return Some(item);
            }
        }
        None
    }

    /// Lazily pairs each item with its zero-based position.
    pub fn enumerate(self) -> AsyncCursor<Enumerate<Self>> {
        self.chain(Enumerate::new)
    }

    /// Lazily drops items equal to an earlier item.
    pub fn unique(self) -> AsyncCursor<Unique<Self>>
    where
        St::Item: Eq + Hash + Clone,
    {
        self.chain(Unique::new)
    }

    /// Drains the cursor, returning the number of items.
    pub async fn count(self) -> usize {
        StreamExt::count(self).await
    }

    /// Drains the cursor, awaiting `func(item, index)` on each item in turn.
    pub async fn for_each<Func, Fut>(self, mut func: Func)
    where
        Func: FnMut(St::Item, usize) -> Fut,
        Fut: Future<Output = ()>,
    {
        self.fold((), |(), item, index| (func)(item, index)).await
    }

    /// Drains the cursor, awaiting the fallible `func(item, index)` on each item. Stops at, and
    /// returns, the first error, leaving the rest unpolled.
    pub async fn try_for_each<Func, Fut, E>(self, mut func: Func) -> Result<(), E>
    where
        Func: FnMut(St::Item, usize) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let mut this = pin!(self);
        let mut index = 0;
        while let Some(item) = this.next().await {
            (func)(item, index).await?;
            index += 1;
        }
        Ok(())
    }

    /// Lazily groups items by the awaited `key_fn(&item, index)` into an [`AsyncGrouped`]
    /// view.
    pub fn group_by<Key, Func, Fut>(
        self,
        mut key_fn: Func,
    ) -> AsyncGrouped<impl Stream<Item = (Key, St::Item)>>
    where
        Key: Eq + Hash + Clone,
        Func: FnMut(&St::Item, usize) -> Fut,
        Fut: Future<Output = Key>,
    {
        AsyncGrouped::from_cursor(self.map(move |item, index| {
            let key = (key_fn)(&item, index);
            async move { (key.await, item) }
        }))
    }

    /// Drains the cursor into a [`Vec`].
    #[doc(alias = "to_array")]
    pub async fn to_vec(self) -> Vec<St::Item> {
        self.collect().await
    }
}

impl<St> Stream for AsyncCursor<St>
where
    St: Stream,
{
    type Item = St::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let mut state = this.state;

        if this.borrowed.take_if(|signal| signal.is_raised()).is_some() {
            tracing::trace!("Stream cursor closed through a borrow.");
            state.set(CursorState::Closed);
        }
        let CursorStateProj::Open { stream } = state.as_mut().project() else {
            return Poll::Ready(None);
        };
        let item = ready!(stream.poll_next(cx));
        if item.is_none() {
            tracing::trace!("Stream cursor exhausted.");
            state.set(CursorState::Closed);
        }
        Poll::Ready(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.state {
            CursorState::Open { stream } if !self.closed_by_borrow() => stream.size_hint(),
            _ => (0, Some(0)),
        }
    }
}

impl<St> FusedStream for AsyncCursor<St>
where
    St: Stream,
{
    fn is_terminated(&self) -> bool {
        matches!(self.state, CursorState::Closed) || self.closed_by_borrow()
    }
}

impl<St> AsyncCursor<St> {
    fn closed_by_borrow(&self) -> bool {
        self.borrowed.as_ref().is_some_and(CloseSignal::is_raised)
    }
}
