//! Release specs
//!
//! Verify release only ever removes the caller's own lock and never fails.

use crate::prelude::*;

#[tokio::test(start_paused = true)]
async fn release_by_holder_frees_the_key() {
    let (locks, store) = locks(LockConfig::default());
    let cancel = CancellationToken::new();
    let lease = locks
        .acquire("orders", &owner("a"), 10 * SECOND, SECOND, &cancel)
        .await
        .unwrap();

    locks.release("orders", lease.owner()).await;

    assert_eq!(store.value("orders"), None);
    assert!(!locks.renewing("orders"));
}

#[tokio::test(start_paused = true)]
async fn release_with_wrong_token_deletes_nothing() {
    let (locks, store) = locks(LockConfig::default());
    let cancel = CancellationToken::new();
    locks
        .acquire("orders", &owner("a"), 10 * SECOND, SECOND, &cancel)
        .await
        .unwrap();

    locks.release("orders", &owner("intruder")).await;

    assert_eq!(store.value("orders").as_deref(), Some("a"));
}

#[tokio::test(start_paused = true)]
async fn release_is_idempotent() {
    let (locks, store) = locks(LockConfig::default());
    let cancel = CancellationToken::new();
    let lease = locks
        .acquire("orders", &owner("a"), 10 * SECOND, SECOND, &cancel)
        .await
        .unwrap();

    locks.release("orders", lease.owner()).await;
    locks.release("orders", lease.owner()).await;
    locks.release("never-held", lease.owner()).await;

    assert_eq!(store.value("orders"), None);
}

#[tokio::test(start_paused = true)]
async fn release_after_lapse_leaves_new_holder_alone() {
    let (locks, store) = locks(LockConfig::default().with_max_renewals(0));
    let cancel = CancellationToken::new();
    locks
        .acquire("orders", &owner("a"), 2 * SECOND, SECOND, &cancel)
        .await
        .unwrap();
    tokio::time::sleep(3 * SECOND).await;

    store
        .set_if_absent("orders", "b", 10 * SECOND)
        .await
        .unwrap();
    locks.release("orders", &owner("a")).await;

    assert_eq!(store.value("orders").as_deref(), Some("b"));
}
