//! Pool eviction specs
//!
//! Verify stale and unhealthy idle resources are replaced on checkout.

use crate::prelude::*;

#[tokio::test]
async fn stale_resource_is_destroyed_and_a_fresh_one_supplied() {
    let (pool, manager, clock) =
        pool(PoolConfig::new(1, 2).with_idle_timeout(Duration::from_secs(60))).await;

    clock.advance(Duration::from_secs(61));
    let conn = pool.get().await.unwrap();

    assert_eq!(conn.id, 2);
    assert_eq!(manager.destroyed(), vec![1]);
    assert_eq!(pool.stats().evicted_idle, 1);
}

#[tokio::test]
async fn only_resources_past_the_timeout_are_evicted() {
    let (pool, manager, clock) =
        pool(PoolConfig::new(2, 2).with_idle_timeout(Duration::from_secs(60))).await;

    // Refresh the second resource's idle timestamp
    let first = pool.get().await.unwrap();
    let second = pool.get().await.unwrap();
    pool.put(first).await.unwrap();
    clock.advance(Duration::from_secs(45));
    pool.put(second).await.unwrap();
    clock.advance(Duration::from_secs(30));

    let conn = pool.get().await.unwrap();

    assert_eq!(conn.id, 2);
    assert_eq!(manager.destroyed(), vec![1]);
}

#[tokio::test]
async fn unhealthy_resource_is_never_handed_out() {
    let (pool, manager, _) = pool(PoolConfig::new(3, 3)).await;
    manager.mark_unhealthy(1);
    manager.mark_unhealthy(2);

    let conn = pool.get().await.unwrap();

    assert_eq!(conn.id, 3);
    assert_eq!(
        manager.calls()[3..],
        [
            ResourceCall::Check { id: 1 },
            ResourceCall::Destroy { id: 1 },
            ResourceCall::Check { id: 2 },
            ResourceCall::Destroy { id: 2 },
            ResourceCall::Check { id: 3 },
        ]
    );
}
