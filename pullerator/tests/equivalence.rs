//! The same chains through the sync and async engines, with async callbacks that never
//! suspend, must agree on results and ordering.
use std::future::ready;
use std::pin::pin;

use pullerator::{AsyncCursor, Cursor};

const SOURCE: [i32; 12] = [5, -3, 8, 0, 5, 2, -1, 3, 8, 13, -3, 4];

fn bucket(x: &i32) -> i32 {
    x.rem_euclid(3)
}

#[tokio::test]
async fn test_scalar_chain() {
    let sync = Cursor::new(SOURCE)
        .filter(|x, _| *x != 0)
        .map(|x, index| x * 10 + index as i32)
        .flat_map(|x, _| [x, -x])
        .unique()
        .skip(1)
        .enumerate()
        .take(9)
        .to_vec();
    let async_ = AsyncCursor::from_sequence(SOURCE)
        .filter(|x, _| ready(*x != 0))
        .map(|x, index| async move { x * 10 + index as i32 })
        .flat_map(|x, _| async move { [x, -x] })
        .unique()
        .skip(1)
        .enumerate()
        .take(9)
        .to_vec()
        .await;
    assert_eq!(sync, async_);
}

#[tokio::test]
async fn test_scalar_terminals() {
    assert_eq!(
        Cursor::new(SOURCE).reduce(|a, b, _| a.max(b)).unwrap(),
        AsyncCursor::from_sequence(SOURCE)
            .reduce(|a, b, _| ready(a.max(b)))
            .await
            .unwrap()
    );
    assert_eq!(
        Cursor::new(SOURCE).find(|x, _| 6 < *x),
        AsyncCursor::from_sequence(SOURCE).find(|x, _| ready(6 < *x)).await
    );
    assert_eq!(
        Cursor::new(SOURCE).every(|x, _| -5 < *x),
        AsyncCursor::from_sequence(SOURCE).every(|x, _| ready(-5 < *x)).await
    );
    assert_eq!(
        Cursor::new(SOURCE).unique().count(),
        AsyncCursor::from_sequence(SOURCE).unique().count().await
    );
}

#[tokio::test]
async fn test_terminal_indices() {
    let mut sync_seen = Vec::new();
    let sync = Cursor::new(SOURCE)
        .filter(|x, _| 0 < *x)
        .reduce(|a, b, index| {
            sync_seen.push(index);
            a + b * index as i32
        });
    let mut async_seen = Vec::new();
    let async_ = AsyncCursor::from_sequence(SOURCE)
        .filter(|x, _| ready(0 < *x))
        .reduce(|a, b, index| {
            async_seen.push(index);
            ready(a + b * index as i32)
        })
        .await;
    assert_eq!(sync.unwrap(), async_.unwrap());
    assert_eq!(vec![1, 2, 3, 4, 5, 6, 7], sync_seen);
    assert_eq!(sync_seen, async_seen);

    assert_eq!(
        Cursor::new(SOURCE).fold(Vec::new(), |mut acc, x, index| {
            acc.push((index, x));
            acc
        }),
        AsyncCursor::from_sequence(SOURCE)
            .fold(Vec::new(), |mut acc, x, index| {
                acc.push((index, x));
                ready(acc)
            })
            .await
    );
}

#[tokio::test]
async fn test_short_circuit_through_borrow_closes_original() {
    let mut sync = Cursor::new(0..10);
    let sync_found = sync.by_ref().find(|x, _| 3 < *x);
    let sync_rest = sync.to_vec();

    let mut async_ = pin!(AsyncCursor::from_sequence(0..10));
    let async_found = async_.as_mut().by_ref().find(|x, _| ready(3 < *x)).await;
    let async_rest = async_.as_mut().by_ref().to_vec().await;

    assert_eq!(Some(4), sync_found);
    assert_eq!(sync_found, async_found);
    assert_eq!(Vec::<i32>::new(), sync_rest);
    assert_eq!(sync_rest, async_rest);

    let mut sync = Cursor::new(0..10);
    assert!(!sync.by_ref().skip(2).every(|x, _| *x < 5));
    let mut async_ = pin!(AsyncCursor::from_sequence(0..10));
    assert!(
        !async_
            .as_mut()
            .by_ref()
            .skip(2)
            .every(|x, _| ready(*x < 5))
            .await
    );
    assert_eq!(sync.count(), async_.as_mut().by_ref().count().await);
}

#[tokio::test]
async fn test_keyed_chain() {
    let sync = Cursor::new(SOURCE)
        .group_by(|x, _| bucket(x))
        .unique()
        .map(|key, x, index| (key * 100 + x, index))
        .skip(1)
        .to_map();
    let async_ = AsyncCursor::from_sequence(SOURCE)
        .group_by(|x, _| ready(bucket(x)))
        .unique()
        .map(|key, x, index| ready((key * 100 + x, index)))
        .skip(1)
        .to_map()
        .await;
    assert_eq!(
        sync.into_iter().collect::<Vec<_>>(),
        async_.into_iter().collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_keyed_terminals() {
    let grouped = || Cursor::new(SOURCE).group_by(|x, _| bucket(x));
    let async_grouped = || AsyncCursor::from_sequence(SOURCE).group_by(|x, _| ready(bucket(x)));

    assert_eq!(
        grouped().reduce(|_, a, b, _| a + b),
        async_grouped().reduce(|_, a, b, _| ready(a + b)).await
    );
    assert_eq!(
        grouped().every(|_, x, _| 0 <= *x),
        async_grouped().every(|_, x, _| ready(0 <= *x)).await
    );
    assert_eq!(
        grouped().find(|_, x, index| 0 < index && *x < 5),
        async_grouped()
            .find(|_, x, index| ready(0 < index && *x < 5))
            .await
    );
    assert_eq!(grouped().count(), async_grouped().count().await);
    assert_eq!(
        grouped().keys().to_vec(),
        async_grouped().keys().to_vec().await
    );
    assert_eq!(
        grouped().flat_map(|_, x, index| vec![x; index]).to_vec(),
        async_grouped()
            .flat_map(|_, x, index| ready(vec![x; index]))
            .to_vec()
            .await
    );
}
