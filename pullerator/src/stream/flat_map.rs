//! [`FlatMap`] and related items.
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::stream::Stream;
use pin_project_lite::pin_project;

pin_project! {
    /// Like [`core::iter::FlatMap`] but as a [`Stream`].
    ///
    /// Takes an async closure `Func(Item, index) -> Fut`, where `Fut` resolves to an iterable,
    /// and flattens the results by one level. The index counts upstream items.
    #[must_use = "streams do nothing unless polled"]
    pub struct FlatMap<St, Func, Fut, IntoIter>
    where
        IntoIter: IntoIterator,
    {
        #[pin]
        stream: St,
        func: Func,
        index: usize,
        #[pin]
        pending_fut: Option<Fut>,
        // Current iterator being consumed
        current_iter: Option<IntoIter::IntoIter>,
    }
}

impl<St, Func, Fut, IntoIter> FlatMap<St, Func, Fut, IntoIter>
where
    St: Stream,
    Func: FnMut(St::Item, usize) -> Fut,
    Fut: Future<Output = IntoIter>,
    IntoIter: IntoIterator,
{
    /// Create with async flat-mapping function `func` and source `stream`.
    pub fn new(stream: St, func: Func) -> Self {
        Self {
            stream,
            func,
            index: 0,
            pending_fut: None,
            current_iter: None,
        }
    }
}

impl<St, Func, Fut, IntoIter> Stream for FlatMap<St, Func, Fut, IntoIter>
where
    St: Stream,
    Func: FnMut(St::Item, usize) -> Fut,
    Fut: Future<Output = IntoIter>,
    IntoIter: IntoIterator,
{
    type Item = IntoIter::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            // First, try to get the next item from the current iterator
            if let Some(iter) = this.current_iter.as_mut() {
                if let Some(item) = iter.next() {
                    return Poll::Ready(Some(item));
                }
                // Current iterator is exhausted, clear it
                *this.current_iter = None;
            }

            if let Some(fut) = this.pending_fut.as_mut().as_pin_mut() {
                let iterable = ready!(fut.poll(cx));
                this.pending_fut.set(None);
                *this.current_iter = Some(iterable.into_iter());
                continue;
            }

            // Get the next item from the stream and start mapping it
            match ready!(this.stream.as_mut().poll_next(cx)) {
                Some(stream_item) => {
                    this.pending_fut.set(Some((this.func)(stream_item, *this.index)));
                    *this.index += 1;
                }
                None => {
                    // Stream is exhausted
                    return Poll::Ready(None);
                }
            }
        }
    }
}
