//! [`Skip`] and related items.
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::stream::{FusedStream, Stream};
use pin_project_lite::pin_project;

pin_project! {
    /// Same as [`core::iter::Skip`] but as a [`Stream`].
    ///
    /// The first `n` items are polled and discarded on the first poll, not on construction.
    #[must_use = "streams do nothing unless polled"]
    pub struct Skip<St> {
        #[pin]
        stream: St,
        remaining: usize,
    }
}

impl<St> Skip<St>
where
    St: Stream,
{
    /// Creates, skipping `n` items of `stream`.
    pub fn new(stream: St, n: usize) -> Self {
        Self {
            stream,
            remaining: n,
        }
    }
}

impl<St> Stream for Skip<St>
where
    St: Stream,
{
    type Item = St::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        while 0 < *this.remaining {
            if ready!(this.stream.as_mut().poll_next(cx)).is_none() {
                return Poll::Ready(None);
            }
            *this.remaining -= 1;
        }
        this.stream.poll_next(cx)
    }
}

impl<St> FusedStream for Skip<St>
where
    St: FusedStream,
{
    fn is_terminated(&self) -> bool {
        self.stream.is_terminated()
    }
}
