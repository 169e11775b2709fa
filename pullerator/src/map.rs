//! [`Map`] and related items.
use crate::{Error, Pull, forward_close};

/// Like [`core::iter::Map`] but as a [`Pull`] cursor, with the mapping function also receiving
/// the item's zero-based position.
#[must_use = "cursors do nothing unless pulled"]
pub struct Map<P, Func> {
    source: P,
    func: Func,
    index: usize,
}

impl<P, Func> Map<P, Func> {
    /// Creates with mapping `func` and upstream `source`.
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

impl<P, Func, ItemOut> Map<P, Func>
where
    P: Pull,
    Func: FnMut(P::Item, usize) -> ItemOut,
{
    fn apply(&mut self, item: P::Item) -> ItemOut {
        let index = self.index;
        self.index += 1;
        (self.func)(item, index)
    }
}

impl<P, Func, ItemOut> Pull for Map<P, Func>
where
    P: Pull,
    Func: FnMut(P::Item, usize) -> ItemOut,
{
    type Item = ItemOut;

    fn pull(&mut self) -> Option<Self::Item> {
        let item = self.source.pull()?;
        Some(self.apply(item))
    }

    fn throw(&mut self, error: Error) -> Result<Option<Self::Item>, Error> {
        Ok(self.source.throw(error)?.map(|item| self.apply(item)))
    }

    forward_close!();
}
