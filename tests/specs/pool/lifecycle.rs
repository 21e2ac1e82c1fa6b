//! Pool lifecycle specs
//!
//! Verify the fill, checkout, return and release sequence end to end.

use crate::prelude::*;

#[tokio::test]
async fn fill_checkout_return_and_overflow() {
    let (pool, manager, _) = pool(PoolConfig::new(2, 3)).await;

    let a = pool.get().await.unwrap();
    let b = pool.get().await.unwrap();
    assert_ne!(a.id, b.id);

    let c = pool.get().await.unwrap();
    assert_eq!(manager.create_count(), 3);

    let d = pool.get().await.unwrap();
    for conn in [a, b, c] {
        pool.put(conn).await.unwrap();
    }
    pool.put(d).await.unwrap();

    assert_eq!(pool.len(), 3);
    assert_eq!(manager.destroyed(), vec![4]);
}

#[tokio::test]
async fn release_tears_down_idle_and_fails_later_calls() {
    let (pool, manager, _) = pool(PoolConfig::new(3, 3)).await;
    let held = pool.get().await.unwrap();

    pool.release().await;
    pool.release().await;

    assert_eq!(manager.destroyed(), vec![2, 3]);
    assert_eq!(pool.len(), 0);
    assert!(matches!(pool.get().await, Err(PoolError::Closed)));
    assert!(matches!(pool.put(held).await, Err(PoolError::Closed)));
    assert_eq!(manager.destroyed(), vec![2, 3, 1]);
}

#[tokio::test]
async fn partial_fill_failure_leaves_nothing_open() {
    let manager = FakeResourceManager::new();
    manager.fail_create_after(1);

    let result = Pool::new(PoolConfig::new(3, 3), manager.clone()).await;

    assert!(matches!(result, Err(PoolError::Fill(_))));
    assert_eq!(manager.destroyed(), vec![1]);
}
