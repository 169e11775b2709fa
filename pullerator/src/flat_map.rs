//! [`FlatMap`] and related items.
use crate::{Error, Pull};

/// Like [`core::iter::FlatMap`] but as a [`Pull`] cursor.
///
/// Takes a closure `Func(Item, index) -> IntoIter` and flattens the results by one level. The
/// index counts upstream items, not flattened outputs. To yield a single element, return a
/// one-element iterable such as `Some(x)` or `[x]`.
#[must_use = "cursors do nothing unless pulled"]
pub struct FlatMap<P, Func, IntoIter>
where
    IntoIter: IntoIterator,
{
    source: P,
    func: Func,
    index: usize,
    // Current iterator being consumed.
    current_iter: Option<IntoIter::IntoIter>,
}

impl<P, Func, IntoIter> FlatMap<P, Func, IntoIter>
where
    IntoIter: IntoIterator,
{
    /// Creates with flat-mapping `func` and upstream `source`.
    pub fn new(source: P, func: Func) -> Self
    where
        Self: Pull,
    {
        Self {
            source,
            func,
            index: 0,
            current_iter: None,
        }
    }
}

impl<P, Func, IntoIter> FlatMap<P, Func, IntoIter>
where
    P: Pull,
    Func: FnMut(P::Item, usize) -> IntoIter,
    IntoIter: IntoIterator,
{
    fn expand(&mut self, item: P::Item) {
        let index = self.index;
        self.index += 1;
        self.current_iter = Some((self.func)(item, index).into_iter());
    }
}

impl<P, Func, IntoIter> Pull for FlatMap<P, Func, IntoIter>
where
    P: Pull,
    Func: FnMut(P::Item, usize) -> IntoIter,
    IntoIter: IntoIterator,
{
    type Item = IntoIter::Item;

    fn pull(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(iter) = self.current_iter.as_mut() {
                if let Some(item) = iter.next() {
                    return Some(item);
                }
                self.current_iter = None;
            }

            let item = self.source.pull()?;
            self.expand(item);
        }
    }

    fn close(&mut self) {
        self.current_iter = None;
        self.source.close();
    }

    fn throw(&mut self, error: Error) -> Result<Option<Self::Item>, Error> {
        // The error lands on the upstream, so the partially flattened item is abandoned.
        self.current_iter = None;
        match self.source.throw(error)? {
            Some(item) => {
                self.expand(item);
                Ok(self.pull())
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IterSource;

    fn drain<P: Pull>(mut source: P) -> Vec<P::Item> {
        let mut items = Vec::new();
        while let Some(item) = source.pull() {
            items.push(item);
        }
        items
    }

    #[test]
    fn test_scalar_as_option() {
        let halves = FlatMap::new(IterSource::new([4, 7, 10]), |x: i32, _| {
            (x % 2 == 0).then_some(x / 2)
        });
        assert_eq!(vec![2, 5], drain(halves));
    }

    #[test]
    fn test_index_counts_upstream_items() {
        let repeated = FlatMap::new(IterSource::new(['x', 'y', 'z']), |c: char, index| {
            std::iter::repeat_n(c, index)
        });
        assert_eq!(vec!['y', 'z', 'z'], drain(repeated));
    }

    #[test]
    fn test_close_drops_partial_item() {
        let mut pairs = FlatMap::new(IterSource::new(0..), |x: i32, _| [x, -x]);
        assert_eq!(Some(0), pairs.pull());
        assert_eq!(Some(0), pairs.pull());
        assert_eq!(Some(1), pairs.pull());
        pairs.close();
        assert_eq!(None, pairs.pull());
    }
}
