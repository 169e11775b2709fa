//! [`LazySource`] and related items.
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::stream::{FusedStream, Stream};
use pin_project_lite::pin_project;

pin_project! {
    #[project = LazySourceProj]
    enum LazySourceState<Func, Fut, St> {
        Uninit {
            // Initialization func, always `Some`.
            func: Option<Func>,
        },
        Thunkulating {
            // Initialization future.
            #[pin]
            fut: Fut,
        },
        Running {
            #[pin]
            stream: St,
        },
        Done,
    }
}

pin_project! {
    /// A lazy source which calls `Func` on the first poll and awaits the returned future to
    /// get the [`Stream`] it then polls from.
    ///
    /// Dropping the source before the first poll drops `Func` uncalled.
    #[must_use = "streams do nothing unless polled"]
    pub struct LazySource<Func, Fut, St> {
        #[pin]
        state: LazySourceState<Func, Fut, St>,
    }
}

impl<Func, Fut, St> LazySource<Func, Fut, St>
where
    Func: FnOnce() -> Fut,
    Fut: Future<Output = St>,
    St: Stream,
{
    /// Creates with the initialization `func`.
    pub fn new(func: Func) -> Self {
        Self {
            state: LazySourceState::Uninit { func: Some(func) },
        }
    }
}

impl<Func, Fut, St> Stream for LazySource<Func, Fut, St>
where
    Func: FnOnce() -> Fut,
    Fut: Future<Output = St>,
    St: Stream,
{
    type Item = St::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut state = self.project().state;

        if let LazySourceProj::Uninit { func } = state.as_mut().project() {
            if let Some(func) = func.take() {
                tracing::debug!("Resolving lazy stream source.");
                let fut = (func)();
                state.set(LazySourceState::Thunkulating { fut });
            }
        }

        if let LazySourceProj::Thunkulating { fut } = state.as_mut().project() {
            let stream = ready!(fut.poll(cx));
            state.set(LazySourceState::Running { stream });
        }

        if let LazySourceProj::Running { stream } = state.as_mut().project() {
            let item = ready!(stream.poll_next(cx));
            if item.is_none() {
                tracing::trace!("Lazy stream source exhausted.");
                state.set(LazySourceState::Done);
            }
            return Poll::Ready(item);
        }

        Poll::Ready(None)
    }
}

impl<Func, Fut, St> FusedStream for LazySource<Func, Fut, St>
where
    Func: FnOnce() -> Fut,
    Fut: Future<Output = St>,
    St: Stream,
{
    fn is_terminated(&self) -> bool {
        matches!(self.state, LazySourceState::Done)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::pin::pin;

    use futures::stream::{self, StreamExt};

    use super::*;

    #[tokio::test]
    async fn test_lazy_source() {
        let test_data = b"test";

        let mut lazy_source = LazySource::new(|| {
            Box::pin(async { stream::iter(vec![test_data.as_slice()]) })
        });

        assert_eq!(lazy_source.next().await.unwrap(), test_data);
        assert_eq!(None, lazy_source.next().await);
    }

    #[test]
    fn test_lazy_source_good() {
        let test_data = b"test";
        let calls = Cell::new(0);

        let mut lazy_source = pin!(LazySource::new(|| {
            calls.set(calls.get() + 1);
            async move { stream::iter(test_data) }
        }));
        assert_eq!(0, calls.get());

        let cx = &mut Context::from_waker(futures::task::noop_waker_ref());

        assert_eq!(Poll::Ready(Some(&b't')), lazy_source.as_mut().poll_next(cx));
        assert_eq!(Poll::Ready(Some(&b'e')), lazy_source.as_mut().poll_next(cx));
        assert_eq!(Poll::Ready(Some(&b's')), lazy_source.as_mut().poll_next(cx));
        assert_eq!(Poll::Ready(Some(&b't')), lazy_source.as_mut().poll_next(cx));
        assert_eq!(Poll::Ready(None), lazy_source.as_mut().poll_next(cx));
        assert!(lazy_source.is_terminated());
        assert_eq!(1, calls.get());
    }
}
