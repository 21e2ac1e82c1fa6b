//! Pool capacity specs
//!
//! Verify the idle queue never grows past the ceiling and checkouts are
//! exclusive.

use crate::prelude::*;

#[tokio::test]
async fn put_beyond_ceiling_destroys_the_overflow() {
    let (pool, manager, _) = pool(PoolConfig::new(1, 2)).await;

    let mut out = Vec::new();
    for _ in 0..5 {
        out.push(pool.get().await.unwrap());
    }
    for conn in out {
        pool.put(conn).await.unwrap();
        assert!(pool.len() <= 2);
    }

    assert_eq!(pool.len(), 2);
    assert_eq!(manager.destroyed(), vec![3, 4, 5]);
    assert_eq!(pool.stats().overflow, 3);
    assert_eq!(pool.open(), 2);
}

#[tokio::test]
async fn concurrent_checkouts_never_share_a_resource() {
    let (pool, _, _) = pool(PoolConfig::new(4, 8)).await;
    let pool = Arc::new(pool);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let pool = Arc::clone(&pool);
        handles.push(tokio::spawn(async move { pool.get().await.unwrap() }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().id);
    }
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), 16);
    assert_eq!(pool.open(), 16);
}

#[tokio::test]
async fn bounded_checkout_refuses_past_the_ceiling() {
    let (pool, manager, _) =
        pool(PoolConfig::new(2, 3).with_checkout(CheckoutPolicy::Bounded)).await;

    let held: Vec<_> = vec![
        pool.get().await.unwrap(),
        pool.get().await.unwrap(),
        pool.get().await.unwrap(),
    ];
    let err = pool.get().await.unwrap_err();

    assert!(matches!(err, PoolError::Exhausted { max: 3 }));
    assert_eq!(manager.create_count(), 3);

    for conn in held {
        pool.put(conn).await.unwrap();
    }
    assert!(pool.get().await.is_ok());
}

#[tokio::test]
async fn factory_errors_reach_the_caller_unretried() {
    let (pool, manager, _) = pool(PoolConfig::new(1, 2)).await;
    let _held = pool.get().await.unwrap();
    manager.fail_create_after(0);

    let err = pool.get().await.unwrap_err();

    assert!(matches!(err, PoolError::Resource(_)));
    // One create for the fill, one failed attempt
    assert_eq!(manager.create_count(), 2);
}
