//! [`Take`] and related items.
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::stream::{FusedStream, Stream};
use pin_project_lite::pin_project;

pin_project! {
    /// Same as [`core::iter::Take`] but as a [`Stream`].
    ///
    /// The upstream is never polled once `n` items were yielded.
    #[must_use = "streams do nothing unless polled"]
    pub struct Take<St> {
        #[pin]
        stream: St,
        remaining: usize,
    }
}

impl<St> Take<St>
where
    St: Stream,
{
    /// Creates, yielding at most `n` items of `stream`.
    pub fn new(stream: St, n: usize) -> Self {
        Self {
            stream,
            remaining: n,
        }
    }
}

impl<St> Stream for Take<St>
where
    St: Stream,
{
    type Item = St::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if 0 == *this.remaining {
            return Poll::Ready(None);
        }
        let item = ready!(this.stream.poll_next(cx));
        if item.is_some() {
            *this.remaining -= 1;
        }
        Poll::Ready(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if 0 == self.remaining {
            return (0, Some(0));
        }
        let (lower, upper) = self.stream.size_hint();
        let upper = upper.map_or(self.remaining, |upper| upper.min(self.remaining));
        (lower.min(self.remaining), Some(upper))
    }
}

impl<St> FusedStream for Take<St>
where
    St: FusedStream,
{
    fn is_terminated(&self) -> bool {
        0 == self.remaining || self.stream.is_terminated()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::stream::{self, StreamExt};

    use super::*;

    #[tokio::test]
    async fn test_take_never_polls_past_n() {
        let polled = Cell::new(0);
        let take = Take::new(
            stream::iter(0..).inspect(|_| polled.set(polled.get() + 1)),
            3,
        );
        let result: Vec<i32> = take.collect().await;
        assert_eq!(vec![0, 1, 2], result);
        assert_eq!(3, polled.get());
    }
}
