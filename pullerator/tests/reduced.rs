use pullerator::{Cursor, Error, Grouped, Reduced};

fn word_lengths() -> Reduced<char, usize> {
    Cursor::new(["apple", "bob", "avocado", "cat", "bee", "dune"])
        .group_by(|word, _| word.chars().next().unwrap_or_default())
        .map(|_, word, _| word.len())
        .reduce(|_, longest, len, _| longest.max(len))
}

#[test]
fn test_reduced_terminals_across_keys() {
    let lengths = word_lengths();
    assert_eq!(
        vec![('a', 7), ('b', 3), ('c', 3), ('d', 4)],
        lengths.clone().into_iter().collect::<Vec<_>>()
    );
    assert!(lengths.clone().every(|_, len, _| 3 <= *len));
    assert!(lengths.clone().some(|key, _, _| *key == 'd'));
    assert_eq!(4, lengths.clone().count());
    assert_eq!(Some(('d', 4)), lengths.clone().find(|_, len, _| 3 < *len && *len < 7));
    assert_eq!(17, lengths.clone().reduce(|a, b, _| a + b).unwrap());
    assert_eq!(
        "a7b3c3d4",
        lengths.fold(String::new(), |mut acc, key, len, _| {
            acc.push(*key);
            acc.push_str(&len.to_string());
            acc
        })
    );
}

#[test]
fn test_reduced_combinators_stay_keyed() {
    let lengths = word_lengths()
        .filter(|key, _, _| *key != 'a')
        .map(|_, len, _| len * 2)
        .enumerate();
    assert_eq!(Some(&(0, 6)), lengths.get(&'b'));
    assert_eq!(Some(&(2, 8)), lengths.get(&'d'));
    assert_eq!(None, lengths.get(&'a'));
    assert_eq!(vec!['c', 'd'], lengths.skip(1).keys().to_vec());
}

#[test]
fn test_unique_is_value_level() {
    // 'b' and 'c' share the value 3, so only the first key holding it survives.
    let unique = word_lengths().unique();
    assert_eq!(vec!['a', 'b', 'd'], unique.keys().to_vec());
}

#[test]
fn test_reduced_unique_differs_from_grouped_unique() {
    let pairs = [("x", 1), ("y", 1), ("x", 1), ("y", 2)];

    // Within each key, "y" keeps both values since they differ from each other.
    let per_key = Grouped::new(pairs).unique().to_map();
    assert_eq!(vec![1], per_key["x"]);
    assert_eq!(vec![1, 2], per_key["y"]);

    // Across keys, "y" is dropped since its value equals the value of "x".
    let firsts = Grouped::new(pairs).reduce(|_, first, _, _| first).unique();
    assert_eq!(vec!["x"], firsts.keys().to_vec());
}

#[test]
fn test_take_entries_values() {
    let lengths = word_lengths();
    assert_eq!(vec![7, 3], lengths.clone().take(2).values().to_vec());
    assert_eq!(vec![('c', 3)], lengths.clone().skip(2).take(1).entries().to_vec());
    assert_eq!(vec![7, 3, 3, 4], lengths.to_vec());
}

#[test]
fn test_reorganize_back_to_grouped() {
    let by_length = word_lengths()
        .reorganize_by(|_, len, _| *len)
        .map(|_, len, index| (index, len))
        .to_map();
    let entries: Vec<_> = by_length.into_iter().collect();
    assert_eq!(
        vec![(7, vec![(0, 7)]), (3, vec![(0, 3), (1, 3)]), (4, vec![(0, 4)])],
        entries
    );
}

#[test]
fn test_callbacks_see_key_positions() {
    let mut positions = Vec::new();
    word_lengths().for_each(|key, _, position| positions.push((*key, position)));
    assert_eq!(vec![('a', 0), ('b', 1), ('c', 2), ('d', 3)], positions);

    // The accumulator is seeded from 'a', so the first combine is at 'b'.
    let mut combined = Vec::new();
    let total = word_lengths()
        .reduce(|a, b, position| {
            combined.push(position);
            a + b
        })
        .unwrap();
    assert_eq!(17, total);
    assert_eq!(vec![1, 2, 3], combined);

    let evens = word_lengths().filter(|_, _, position| position % 2 == 0);
    assert_eq!(vec!['a', 'c'], evens.keys().to_vec());
    assert!(!word_lengths().every(|_, len, position| position < 3 || *len == 3));
}

#[test]
fn test_for_each_in_key_order() {
    let mut seen = String::new();
    word_lengths().for_each(|key, _, _| seen.push(*key));
    assert_eq!("abcd", seen);
}

#[test]
fn test_empty_reduced() {
    let empty = Reduced::<char, usize>::default();
    assert!(empty.is_empty());
    assert!(empty.clone().every(|_, _, _| false));
    assert!(!empty.clone().some(|_, _, _| true));
    assert_eq!(0, empty.clone().count());
    assert!(matches!(empty.reduce(|a, b, _| a + b), Err(Error::EmptyReduce)));
}

#[test]
fn test_to_object_uses_display_keys() {
    let object = word_lengths().take(2).to_object().unwrap();
    assert_eq!(
        serde_json::json!({ "a": 7, "b": 3 }),
        serde_json::Value::Object(object)
    );
}

#[test]
fn test_to_map_round_trip() {
    let map = word_lengths().to_map();
    assert_eq!(Some(&4), map.get(&'d'));
    assert_eq!(word_lengths(), Reduced::from_map(map));
}
