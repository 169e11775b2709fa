//! Per-key bookkeeping shared by the keyed views.
use std::hash::Hash;

use indexmap::IndexMap;

/// Ordered table of `key -> (visits, state)`, in first-seen key order.
///
/// `visits` is the per-key index: it starts at zero and increments exactly once per visit of
/// that key, independent of every other key.
pub(crate) struct KeyTable<K, S> {
    slots: IndexMap<K, (usize, S)>,
}

impl<K, S> Default for KeyTable<K, S> {
    fn default() -> Self {
        Self {
            slots: IndexMap::new(),
        }
    }
}

impl<K, S> KeyTable<K, S>
where
    K: Eq + Hash + Clone,
{
    /// Records one visit of `key`, creating its state with `init` on the first visit.
    ///
    /// Returns the per-key index of this visit and the key's state.
    pub(crate) fn visit(&mut self, key: &K, init: impl FnOnce(&K) -> S) -> (usize, &mut S) {
        let position = match self.slots.get_index_of(key) {
            Some(position) => position,
            None => self.slots.insert_full(key.clone(), (0, (init)(key))).0,
        };
        let (visits, state) = &mut self.slots[position];
        let index = *visits;
        *visits += 1;
        (index, state)
    }

    pub(crate) fn into_states(self) -> IndexMap<K, S> {
        self.slots
            .into_iter()
            .map(|(key, (_, state))| (key, state))
            .collect()
    }
}

/// Per-key index without any auxiliary state.
pub(crate) type KeyIndex<K> = KeyTable<K, ()>;

impl<K> KeyIndex<K>
where
    K: Eq + Hash + Clone,
{
    /// Returns the next per-key index of `key`.
    pub(crate) fn next_index(&mut self, key: &K) -> usize {
        self.visit(key, |_| ()).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_per_key() {
        let mut index = KeyIndex::default();
        let seen: Vec<_> = ["a", "b", "a", "a", "c", "b"]
            .iter()
            .map(|key| index.next_index(key))
            .collect();
        assert_eq!(vec![0, 0, 1, 2, 0, 1], seen);
    }

    #[test]
    fn test_states_in_first_seen_order() {
        let mut table = KeyTable::default();
        for (key, value) in [("y", 1), ("x", 2), ("y", 3)] {
            let (_, sum) = table.visit(&key, |_| 0);
            *sum += value;
        }
        let states: Vec<_> = table.into_states().into_iter().collect();
        assert_eq!(vec![("y", 4), ("x", 2)], states);
    }
}
