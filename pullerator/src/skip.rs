//! [`Skip`] and related items.
use crate::{Error, Pull, forward_close};

/// Same as [`core::iter::Skip`] but as a [`Pull`] cursor.
///
/// The first `n` items are pulled and discarded on the first pull, not on construction.
#[must_use = "cursors do nothing unless pulled"]
pub struct Skip<P> {
    source: P,
    remaining: usize,
}

impl<P> Skip<P>
where
    P: Pull,
{
    /// Creates, skipping `n` items of `source`.
    pub fn new(source: P, n: usize) -> Self {
        Self {
            source,
            remaining: n,
        }
    }
}

impl<P> Pull for Skip<P>
where
    P: Pull,
{
    type Item = P::Item;

    fn pull(&mut self) -> Option<Self::Item> {
        while 0 < self.remaining {
            self.remaining -= 1;
            let _skipped = self.source.pull()?;
        }
        self.source.pull()
    }

    fn throw(&mut self, error: Error) -> Result<Option<Self::Item>, Error> {
        match self.source.throw(error)? {
            Some(_) if 0 < self.remaining => {
                self.remaining -= 1;
                Ok(self.pull())
            }
            item => Ok(item),
        }
    }

    forward_close!();
}
