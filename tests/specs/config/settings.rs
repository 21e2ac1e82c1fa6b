//! Settings specs
//!
//! Verify TOML settings drive lock and pool construction.

use crate::prelude::*;

const SETTINGS: &str = r#"
[lock]
backoff = "100ms"
max_renewals = 2
lease = "4s"

[pool]
initial = 2
max = 4
idle_timeout = "5m"
checkout = "bounded"

[redis]
addr = "10.0.0.5:6379"
"#;

#[tokio::test(start_paused = true)]
async fn settings_configure_locks_and_pools() {
    let settings = Settings::from_toml(SETTINGS).unwrap();

    let (locks, store) = locks(settings.lock.clone());
    let lease = locks
        .acquire_default("orders", SECOND, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(lease.duration(), 4 * SECOND);
    assert_eq!(store.value("orders"), Some(lease.owner().to_string()));

    let (pool, _, _) = pool(settings.pool.clone()).await;
    assert_eq!(pool.len(), 2);
    assert_eq!(pool.config().checkout, CheckoutPolicy::Bounded);
}

#[tokio::test]
async fn invalid_pool_bounds_are_rejected_before_any_create() {
    let err = Settings::from_toml("[pool]\ninitial = 5\nmax = 2\n").unwrap_err();
    assert!(err.to_string().contains("exceeds max"));

    let manager = FakeResourceManager::new();
    let result = Pool::new(PoolConfig::new(5, 2), manager.clone()).await;
    assert!(matches!(result, Err(PoolError::Config(_))));
    assert_eq!(manager.create_count(), 0);
}
