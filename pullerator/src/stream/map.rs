//! [`Map`] and related items.
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::stream::{FusedStream, Stream};
use pin_project_lite::pin_project;

pin_project! {
    /// Like [`core::iter::Map`] but as a [`Stream`], with an async mapping function which also
    /// receives the item's zero-based position.
    ///
    /// Each output is awaited before the next item is pulled from upstream.
    #[must_use = "streams do nothing unless polled"]
    pub struct Map<St, Func, Fut> {
        #[pin]
        stream: St,
        func: Func,
        index: usize,
        #[pin]
        pending_fut: Option<Fut>,
    }
}

impl<St, Func, Fut> Map<St, Func, Fut>
where
    St: Stream,
    Func: FnMut(St::Item, usize) -> Fut,
    Fut: Future,
{
    /// Creates with async mapping `func` and upstream `stream`.
    pub fn new(stream: St, func: Func) -> Self {
        Self {
            stream,
            func,
            index: 0,
            pending_fut: None,
        }
    }
}

impl<St, Func, Fut> Stream for Map<St, Func, Fut>
where
    St: Stream,
    Func: FnMut(St::Item, usize) -> Fut,
    Fut: Future,
{
    type Item = Fut::Output;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if this.pending_fut.is_none() {
            let Some(item) = ready!(this.stream.as_mut().poll_next(cx)) else {
                return Poll::Ready(None);
            };
            this.pending_fut.set(Some((this.func)(item, *this.index)));
            *this.index += 1;
        }

        let Some(fut) = this.pending_fut.as_mut().as_pin_mut() else {
            return Poll::Ready(None);
        };
        let output = ready!(fut.poll(cx));
        this.pending_fut.set(None);
        Poll::Ready(Some(output))
    }
}

impl<St, Func, Fut> FusedStream for Map<St, Func, Fut>
where
    St: FusedStream,
    Func: FnMut(St::Item, usize) -> Fut,
    Fut: Future,
{
    fn is_terminated(&self) -> bool {
        self.pending_fut.is_none() && self.stream.is_terminated()
    }
}
