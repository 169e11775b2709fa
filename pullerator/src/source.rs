//! [`IterSource`], [`FnSource`], and related items.
//!
//! These adapt the two plain-Rust source shapes, sequences and generator functions, into the
//! [`Pull`] protocol. Custom pull sources implement [`Pull`] directly.

use crate::Pull;

/// Adapts an [`Iterator`] into a fused [`Pull`] source.
///
/// The iterator is dropped once it returns `None` or the source is closed, after which every
/// pull returns `None`.
#[must_use = "cursors do nothing unless pulled"]
pub struct IterSource<I> {
    iter: Option<I>,
}

impl<I> IterSource<I>
where
    I: Iterator,
{
    /// Creates from anything iterable.
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            iter: Some(iter.into_iter()),
        }
    }
}

impl<I> Pull for IterSource<I>
where
    I: Iterator,
{
    type Item = I::Item;

    fn pull(&mut self) -> Option<Self::Item> {
        let item = self.iter.as_mut()?.next();
        if item.is_none() {
            tracing::trace!("Source exhausted, releasing iterator.");
            self.iter = None;
        }
        item
    }

    fn close(&mut self) {
        if self.iter.take().is_some() {
            tracing::trace!("Source closed before exhaustion.");
        }
    }
}

enum FnSourceState<Func, IntoIter>
where
    IntoIter: IntoIterator,
{
    Uninit { func: Func },
    Running { iter: IntoIter::IntoIter },
    Done,
}

/// A lazy source which calls a generator function on the first pull and then pulls from
/// whatever it returned.
///
/// Closing before the first pull drops the function without calling it.
#[must_use = "cursors do nothing unless pulled"]
pub struct FnSource<Func, IntoIter>
where
    IntoIter: IntoIterator,
{
    state: FnSourceState<Func, IntoIter>,
}

impl<Func, IntoIter> FnSource<Func, IntoIter>
where
    Func: FnOnce() -> IntoIter,
    IntoIter: IntoIterator,
{
    /// Creates with generator function `func`.
    pub fn new(func: Func) -> Self {
        Self {
            state: FnSourceState::Uninit { func },
        }
    }
}

impl<Func, IntoIter> Pull for FnSource<Func, IntoIter>
where
    Func: FnOnce() -> IntoIter,
    IntoIter: IntoIterator,
{
    type Item = IntoIter::Item;

    fn pull(&mut self) -> Option<Self::Item> {
        if matches!(self.state, FnSourceState::Uninit { .. }) {
            if let FnSourceState::Uninit { func } =
                std::mem::replace(&mut self.state, FnSourceState::Done)
            {
                tracing::debug!("Resolving generator function source.");
                self.state = FnSourceState::Running {
                    iter: (func)().into_iter(),
                };
            }
        }

        if let FnSourceState::Running { iter } = &mut self.state {
            if let Some(item) = iter.next() {
                return Some(item);
            }
            tracing::trace!("Generator source exhausted.");
            self.state = FnSourceState::Done;
        }
        None
    }

    fn close(&mut self) {
        self.state = FnSourceState::Done;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_iter_source_fused() {
        let mut source = IterSource::new(vec![1, 2]);
        assert_eq!(Some(1), source.pull());
        assert_eq!(Some(2), source.pull());
        assert_eq!(None, source.pull());
        assert_eq!(None, source.pull());
    }

    #[test]
    fn test_iter_source_close() {
        let mut source = IterSource::new(0..);
        assert_eq!(Some(0), source.pull());
        source.close();
        assert_eq!(None, source.pull());
    }

    #[test]
    fn test_fn_source_is_lazy() {
        let calls = Cell::new(0);
        let mut source = FnSource::new(|| {
            calls.set(calls.get() + 1);
            vec!['a', 'b']
        });
        assert_eq!(0, calls.get());
        assert_eq!(Some('a'), source.pull());
        assert_eq!(Some('b'), source.pull());
        assert_eq!(None, source.pull());
        assert_eq!(1, calls.get());
    }

    #[test]
    fn test_fn_source_close_before_pull() {
        let calls = Cell::new(0);
        let mut source = FnSource::new(|| {
            calls.set(calls.get() + 1);
            0..3
        });
        source.close();
        assert_eq!(None, source.pull());
        assert_eq!(0, calls.get());
    }

    #[test]
    fn test_default_throw_rethrows() {
        let mut source = IterSource::new([1]);
        let error = source.throw(crate::Error::thrown("nope")).unwrap_err();
        assert!(matches!(error, crate::Error::Thrown(_)));
        assert_eq!(Some(1), source.pull());
    }
}
