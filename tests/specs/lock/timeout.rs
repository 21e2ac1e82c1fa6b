//! Acquisition timeout specs
//!
//! Verify acquire gives up on a held key within its timeout plus one backoff.

use crate::prelude::*;

#[tokio::test(start_paused = true)]
async fn acquire_on_held_key_returns_within_timeout_plus_backoff() {
    for timeout_ms in [100, 250, 1000, 3333] {
        let (locks, store) = locks(LockConfig::default());
        let cancel = CancellationToken::new();
        store
            .set_if_absent("orders", "holder", 60 * SECOND)
            .await
            .unwrap();

        let timeout = Duration::from_millis(timeout_ms);
        let start = Instant::now();
        let err = locks
            .acquire("orders", &owner("a"), 10 * SECOND, timeout, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, LockError::SeizeTimeout { .. }));
        assert!(start.elapsed() <= timeout + locks.config().backoff);
        assert_eq!(store.value("orders").as_deref(), Some("holder"));
        assert!(!locks.renewing("orders"));
    }
}

#[tokio::test(start_paused = true)]
async fn zero_timeout_waits_until_the_key_frees() {
    let (locks, store) = locks(LockConfig::default());
    store
        .set_if_absent("orders", "holder", 30 * SECOND)
        .await
        .unwrap();

    let lease = locks
        .acquire(
            "orders",
            &owner("a"),
            10 * SECOND,
            Duration::ZERO,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(lease.owner(), &owner("a"));
    assert_eq!(store.value("orders").as_deref(), Some("a"));
}

#[tokio::test(start_paused = true)]
async fn custom_backoff_paces_retries() {
    let (locks, store) =
        locks(LockConfig::default().with_backoff(Duration::from_millis(500)));
    store
        .set_if_absent("orders", "holder", 60 * SECOND)
        .await
        .unwrap();
    store.clear_calls();

    let _ = locks
        .acquire(
            "orders",
            &owner("a"),
            10 * SECOND,
            2 * SECOND,
            &CancellationToken::new(),
        )
        .await;

    // Attempts at 0, 0.5, 1.0 and 1.5s
    assert_eq!(store.calls().len(), 4);
}
