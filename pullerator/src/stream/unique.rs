//! [`Unique`] and related items.
use std::hash::Hash;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::stream::{FusedStream, Stream};
use pin_project_lite::pin_project;
use rustc_hash::FxHashSet;

pin_project! {
    /// Drops every item equal to one already yielded, keeping first occurrences in order.
    #[must_use = "streams do nothing unless polled"]
    pub struct Unique<St>
    where
        St: Stream,
    {
        #[pin]
        stream: St,
        seen: FxHashSet<St::Item>,
    }
}

impl<St> Unique<St>
where
    St: Stream,
    St::Item: Eq + Hash + Clone,
{
    /// Creates, deduplicating the items of `stream`.
    pub fn new(stream: St) -> Self {
        Self {
            stream,
            seen: FxHashSet::default(),
        }
    }
}

impl<St> Stream for Unique<St>
where
    St: Stream,
    St::Item: Eq + Hash + Clone,
{
    type Item = St::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        while let Some(item) = ready!(this.stream.as_mut().poll_next(cx)) {
            if this.seen.insert(item.clone()) {
                return Poll::Ready(Some(item));
            }
        }
        Poll::Ready(None)
    }
}

impl<St> FusedStream for Unique<St>
where
    St: FusedStream,
    St::Item: Eq + Hash + Clone,
{
    fn is_terminated(&self) -> bool {
        self.stream.is_terminated()
    }
}
