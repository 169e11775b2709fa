//! [`Filter`] and related items.
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::stream::{FusedStream, Stream};
use pin_project_lite::pin_project;

pin_project! {
    /// Like [`core::iter::Filter`] but as a [`Stream`], with an async predicate which also
    /// receives the item's zero-based position upstream.
    ///
    /// Holds at most one item while its predicate future is pending.
    #[must_use = "streams do nothing unless polled"]
    pub struct Filter<St, Func, Fut>
    where
        St: Stream,
    {
        #[pin]
        stream: St,
        func: Func,
        index: usize,
        #[pin]
        pending_fut: Option<Fut>,
        pending_item: Option<St::Item>,
    }
}

impl<St, Func, Fut> Filter<St, Func, Fut>
where
    St: Stream,
    Func: FnMut(&St::Item, usize) -> Fut,
    Fut: Future<Output = bool>,
{
    /// Creates with async predicate `func` and upstream `stream`.
    pub fn new(stream: St, func: Func) -> Self {
        Self {
            stream,
            func,
            index: 0,
            pending_fut: None,
            pending_item: None,
        }
    }
}

impl<St, Func, Fut> Stream for Filter<St, Func, Fut>
where
    St: Stream,
    Func: FnMut(&St::Item, usize) -> Fut,
    Fut: Future<Output = bool>,
{
    type Item = St::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(fut) = this.pending_fut.as_mut().as_pin_mut() {
                let passed = ready!(fut.poll(cx));
                this.pending_fut.set(None);
                if let Some(item) = this.pending_item.take().filter(|_| passed) {
                    return Poll::Ready(Some(item));
                }
            } else if let Some(item) = ready!(this.stream.as_mut().poll_next(cx)) {
                this.pending_fut.set(Some((this.func)(&item, *this.index)));
                *this.index += 1;
                *this.pending_item = Some(item);
            } else {
                return Poll::Ready(None);
            }
        }
    }
}

impl<St, Func, Fut> FusedStream for Filter<St, Func, Fut>
where
    St: FusedStream,
    Func: FnMut(&St::Item, usize) -> Fut,
    Fut: Future<Output = bool>,
{
    fn is_terminated(&self) -> bool {
        self.pending_fut.is_none() && self.stream.is_terminated()
    }
}

#[cfg(test)]
mod tests {
    use futures::stream::{self, StreamExt};

    use super::*;

    #[tokio::test]
    async fn test_filter_async_predicate() {
        let filtered = Filter::new(stream::iter(1..=6), |x: &i32, index| {
            let x = *x;
            async move { x % 3 == 0 || index == 0 }
        });
        let result: Vec<i32> = filtered.collect().await;
        assert_eq!(vec![1, 3, 6], result);
    }
}
