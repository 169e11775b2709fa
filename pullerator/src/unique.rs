//! [`Unique`] and related items.
use std::hash::Hash;

use rustc_hash::FxHashSet;

use crate::{Error, Pull, forward_close};

/// Drops every item equal to one already pulled, keeping first occurrences in order.
///
/// Each distinct item is cloned once into the seen-set.
#[must_use = "cursors do nothing unless pulled"]
pub struct Unique<P>
where
    P: Pull,
{
    source: P,
    seen: FxHashSet<P::Item>,
}

impl<P> Unique<P>
where
    P: Pull,
    P::Item: Eq + Hash + Clone,
{
    /// Creates, deduplicating the items of `source`.
    pub fn new(source: P) -> Self {
        Self {
            source,
            seen: FxHashSet::default(),
        }
    }
}

impl<P> Pull for Unique<P>
where
    P: Pull,
    P::Item: Eq + Hash + Clone,
{
    type Item = P::Item;

    fn pull(&mut self) -> Option<Self::Item> {
        while let Some(item) = self.source.pull() {
            if self.seen.insert(item.clone()) {
                return Some(item);
            }
        }
        None
    }

    fn throw(&mut self, error: Error) -> Result<Option<Self::Item>, Error> {
        match self.source.throw(error)? {
            Some(item) if self.seen.insert(item.clone()) => Ok(Some(item)),
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
    fn test_unique_keeps_first_occurrence() {
        let mut unique = Unique::new(IterSource::new([3, 1, 3, 2, 1, 4]));
        let mut result = Vec::new();
        while let Some(x) = unique.pull() {
            result.push(x);
        }
        assert_eq!(vec![3, 1, 2, 4], result);
    }
}
