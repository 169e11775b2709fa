//! [`Enumerate`] and related items.
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::stream::{FusedStream, Stream};
use pin_project_lite::pin_project;

pin_project! {
    /// Same as [`core::iter::Enumerate`] but as a [`Stream`].
    #[must_use = "streams do nothing unless polled"]
    pub struct Enumerate<St> {
        #[pin]
        stream: St,
        count: usize,
    }
}

impl<St> Enumerate<St>
where
    St: Stream,
{
    /// Creates, numbering the items of `stream` from zero.
    pub fn new(stream: St) -> Self {
        Self { stream, count: 0 }
    }
}

impl<St> Stream for Enumerate<St>
where
    St: Stream,
{
    type Item = (usize, St::Item);

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        let Some(item) = ready!(this.stream.poll_next(cx)) else {
            return Poll::Ready(None);
        };
        let index = *this.count;
        *this.count += 1;
        Poll::Ready(Some((index, item)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stream.size_hint()
    }
}

impl<St> FusedStream for Enumerate<St>
where
    St: FusedStream,
{
    fn is_terminated(&self) -> bool {
        self.stream.is_terminated()
    }
}
