//! Lease renewal specs
//!
//! Verify a held lock outlives its lease by the renewal budget, then lapses.

use crate::prelude::*;

/// (lease seconds, renewal budget)
const CASES: [(u64, u32); 5] = [(2, 1), (3, 3), (4, 3), (5, 2), (10, 3)];

#[tokio::test(start_paused = true)]
async fn renewal_holds_lock_for_budget_then_lapses() {
    for (lease_secs, budget) in CASES {
        let (locks, store) = locks(LockConfig::default().with_max_renewals(budget));
        let key = format!("lease-{lease_secs}-{budget}");
        let interval = lease_secs.div_ceil(2);
        let held_for = Duration::from_secs(u64::from(budget) * interval);
        let lapsed_by = Duration::from_secs(u64::from(budget + 1) * interval);
        let start = Instant::now();

        let lease = locks
            .acquire(
                &key,
                &owner("a"),
                Duration::from_secs(lease_secs),
                SECOND,
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(lease.renewal_interval(), Duration::from_secs(interval));

        tokio::time::sleep_until(start + held_for).await;
        assert_eq!(
            store.value(&key).as_deref(),
            Some("a"),
            "lease {lease_secs}s, budget {budget}: lost before {held_for:?}"
        );

        tokio::time::sleep_until(start + lapsed_by + Duration::from_millis(1)).await;
        assert_eq!(
            store.value(&key),
            None,
            "lease {lease_secs}s, budget {budget}: still held after {lapsed_by:?}"
        );
        assert!(!locks.renewing(&key));
    }
}

#[tokio::test(start_paused = true)]
async fn cancelling_the_acquire_scope_stops_renewal() {
    let (locks, store) = locks(LockConfig::default());
    let cancel = CancellationToken::new();
    locks
        .acquire("orders", &owner("a"), 4 * SECOND, SECOND, &cancel)
        .await
        .unwrap();

    cancel.cancel();
    tokio::time::sleep(Duration::from_millis(4001)).await;

    assert_eq!(store.refresh_count("orders"), 0);
    assert_eq!(store.value("orders"), None);
}

#[tokio::test(start_paused = true)]
async fn unreachable_store_during_renewal_lets_lease_lapse() {
    let (locks, store) = locks(LockConfig::default());
    locks
        .acquire("orders", &owner("a"), 2 * SECOND, SECOND, &CancellationToken::new())
        .await
        .unwrap();

    store.set_refresh_fails(true);
    tokio::time::sleep(Duration::from_millis(2001)).await;

    assert_eq!(store.value("orders"), None);
}
