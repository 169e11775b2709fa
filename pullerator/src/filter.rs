//! [`Filter`] and related items.
use crate::{Error, Pull, forward_close};

/// Like [`core::iter::Filter`] but as a [`Pull`] cursor, with the predicate also receiving the
/// item's zero-based position upstream.
///
/// Pulls from the upstream until an item passes `func`.
#[must_use = "cursors do nothing unless pulled"]
pub struct Filter<P, Func> {
    source: P,
    func: Func,
    index: usize,
}

impl<P, Func> Filter<P, Func> {
    /// Creates with filtering `func` and upstream `source`.
    pub fn new(source: P, func: Func) -> Self
    where
        Self: Pull,
    {
        Self {
            source,
            func,
            index: 0,
        }
    }
}

impl<P, Func> Filter<P, Func>
where
    P: Pull,
    Func: FnMut(&P::Item, usize) -> bool,
{
    fn check(&mut self, item: &P::Item) -> bool {
        let index = self.index;
        self.index += 1;
        (self.func)(item, index)
    }
}

impl<P, Func> Pull for Filter<P, Func>
where
    P: Pull,
    Func: FnMut(&P::Item, usize) -> bool,
{
    type Item = P::Item;

    fn pull(&mut self) -> Option<Self::Item> {
        while let Some(item) = self.source.pull() {
            if self.check(&item) {
                return Some(item);
            }
        }
        None
    }

    fn throw(&mut self, error: Error) -> Result<Option<Self::Item>, Error> {
        match self.source.throw(error)? {
            Some(item) if self.check(&item) => Ok(Some(item)),
            Some(_) => Ok(self.pull()),
            None => Ok(None),
        }
    }

    forward_close!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IterSource;

    #[test]
    fn test_filter_sees_upstream_positions() {
        let mut seen = Vec::new();
        let mut filter = Filter::new(IterSource::new(['a', 'b', 'c', 'd']), |c: &char, index| {
            seen.push(index);
            *c != 'b'
        });
        assert_eq!(Some('a'), filter.pull());
        assert_eq!(Some('c'), filter.pull());
        assert_eq!(Some('d'), filter.pull());
        assert_eq!(None, filter.pull());
        drop(filter);
        assert_eq!(vec![0, 1, 2, 3], seen);
    }
}
