//! Terminal materializers shared by the sync and async keyed views.
use std::hash::Hash;

use indexmap::IndexMap;

use crate::Pull;

/// Appends `value` to the group of `key`, opening the group on first sight.
pub(crate) fn push_grouped<K, V>(groups: &mut IndexMap<K, Vec<V>>, key: K, value: V)
where
    K: Eq + Hash,
{
    groups.entry(key).or_default().push(value);
}

/// Drains `source` into per-key groups, in first-seen key order.
pub(crate) fn group_pairs<P, K, V>(mut source: P) -> IndexMap<K, Vec<V>>
where
    P: Pull<Item = (K, V)>,
    K: Eq + Hash,
{
    let mut groups = IndexMap::new();
    while let Some((key, value)) = source.pull() {
        push_grouped(&mut groups, key, value);
    }
    groups
}

/// Converts entries into a JSON object keyed by each key's [`Display`](std::fmt::Display) form.
///
/// Later entries overwrite earlier ones whose keys display identically, in place.
#[cfg(feature = "serde")]
pub(crate) fn to_object<K, V>(
    entries: impl IntoIterator<Item = (K, V)>,
) -> Result<serde_json::Map<String, serde_json::Value>, crate::Error>
where
    K: std::fmt::Display,
    V: serde::Serialize,
{
    let mut object = serde_json::Map::new();
    for (key, value) in entries {
        object.insert(key.to_string(), serde_json::to_value(value)?);
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IterSource;

    #[test]
    fn test_group_pairs_first_seen_order() {
        let pairs = [("b", 1), ("a", 2), ("b", 3), ("c", 4), ("a", 5)];
        let groups = group_pairs(IterSource::new(pairs));
        let groups: Vec<_> = groups.into_iter().collect();
        assert_eq!(
            vec![("b", vec![1, 3]), ("a", vec![2, 5]), ("c", vec![4])],
            groups
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_to_object() {
        let object = to_object([(1, vec!["x"]), (2, vec![])]).unwrap();
        assert_eq!(
            serde_json::json!({ "1": ["x"], "2": [] }),
            serde_json::Value::Object(object)
        );
    }
}
