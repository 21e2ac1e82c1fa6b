//! Mutual exclusion specs
//!
//! Verify that concurrent contenders for one key never both hold it.

use crate::prelude::*;

#[tokio::test(start_paused = true)]
async fn two_contenders_exactly_one_wins() {
    let (locks, store) = locks(LockConfig::default());
    let locks = Arc::new(locks);
    let cancel = CancellationToken::new();

    let mut handles = Vec::new();
    for name in ["a", "b"] {
        let locks = Arc::clone(&locks);
        let cancel = cancel.clone();
        handles.push(tokio::spawn(async move {
            locks
                .acquire("orders", &owner(name), 30 * SECOND, 3 * SECOND, &cancel)
                .await
        }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        if let Ok(lease) = handle.await.unwrap() {
            winners.push(lease.owner().clone());
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(store.value("orders"), Some(winners[0].to_string()));
}

#[tokio::test(start_paused = true)]
async fn managers_sharing_a_store_exclude_each_other() {
    let shared = MemoryStore::with_clock(TokioClock);
    let first = LockManager::new(TracedStore::new(shared.clone()), LockConfig::default());
    let second = LockManager::new(TracedStore::new(shared.clone()), LockConfig::default());
    let cancel = CancellationToken::new();

    let held = first
        .acquire("orders", &owner("a"), 30 * SECOND, SECOND, &cancel)
        .await
        .unwrap();
    let blocked = second
        .acquire("orders", &owner("b"), 30 * SECOND, SECOND, &cancel)
        .await;
    assert!(matches!(blocked, Err(LockError::SeizeTimeout { .. })));

    first.release("orders", held.owner()).await;
    let taken = second
        .acquire("orders", &owner("b"), 30 * SECOND, SECOND, &cancel)
        .await
        .unwrap();

    assert_eq!(shared.value("orders").as_deref(), Some(taken.owner().as_str()));
}

#[tokio::test(start_paused = true)]
async fn waiter_takes_over_within_one_backoff_of_release() {
    let (locks, store) = locks(LockConfig::default());
    let locks = Arc::new(locks);
    let cancel = CancellationToken::new();
    locks
        .acquire("orders", &owner("a"), 30 * SECOND, SECOND, &cancel)
        .await
        .unwrap();

    let waiter = {
        let locks = Arc::clone(&locks);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let lease = locks
                .acquire("orders", &owner("b"), 30 * SECOND, 10 * SECOND, &cancel)
                .await;
            (lease, Instant::now())
        })
    };

    tokio::time::sleep(2 * SECOND).await;
    let released_at = Instant::now();
    locks.release("orders", &owner("a")).await;

    let (lease, acquired_at) = waiter.await.unwrap();
    assert_eq!(lease.unwrap().owner(), &owner("b"));
    assert!(acquired_at - released_at <= locks.config().backoff);
    assert_eq!(store.value("orders").as_deref(), Some("b"));
}
