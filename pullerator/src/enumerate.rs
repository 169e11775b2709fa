//! [`Enumerate`] and related items.
use crate::{Error, Pull, forward_close};

/// Same as [`core::iter::Enumerate`] but as a [`Pull`] cursor.
#[must_use = "cursors do nothing unless pulled"]
pub struct Enumerate<P> {
    source: P,
    count: usize,
}

impl<P> Enumerate<P>
where
    P: Pull,
{
    /// Creates, numbering the items of `source` from zero.
    pub fn new(source: P) -> Self {
        Self { source, count: 0 }
    }

    fn number(&mut self, item: P::Item) -> (usize, P::Item) {
        let index = self.count;
        self.count += 1;
        (index, item)
    }
}

impl<P> Pull for Enumerate<P>
where
    P: Pull,
{
    type Item = (usize, P::Item);

    fn pull(&mut self) -> Option<Self::Item> {
        let item = self.source.pull()?;
        Some(self.number(item))
    }

    fn throw(&mut self, error: Error) -> Result<Option<Self::Item>, Error> {
        Ok(self.source.throw(error)?.map(|item| self.number(item)))
    }

    forward_close!();
}
