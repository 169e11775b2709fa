//! [`Take`] and related items.
use crate::{Error, Pull, forward_close};

/// Same as [`core::iter::Take`] but as a [`Pull`] cursor.
///
/// Never pulls more than `n` items from the upstream, so anything after them stays in the
/// source for whoever pulls it next.
#[must_use = "cursors do nothing unless pulled"]
pub struct Take<P> {
    source: P,
    remaining: usize,
}

impl<P> Take<P>
where
    P: Pull,
{
    /// Creates, yielding at most `n` items of `source`.
    pub fn new(source: P, n: usize) -> Self {
        Self {
            source,
            remaining: n,
        }
    }
}

impl<P> Pull for Take<P>
where
    P: Pull,
{
    type Item = P::Item;

    fn pull(&mut self) -> Option<Self::Item> {
        if 0 == self.remaining {
            return None;
        }
        let item = self.source.pull()?;
        self.remaining -= 1;
        Some(item)
    }

    fn throw(&mut self, error: Error) -> Result<Option<Self::Item>, Error> {
        if 0 == self.remaining {
            return Err(error);
        }
        let item = self.source.throw(error)?;
        if item.is_some() {
            self.remaining -= 1;
        }
        Ok(item)
    }

    forward_close!();
}
