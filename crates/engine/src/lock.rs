// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock manager: named advisory locks over a coordination store
//!
//! A lock is a key whose value is the holder's owner token. Acquiring sets
//! the key only if it is absent, with the lease as its expiry. While held, a
//! background task refreshes the expiry a bounded number of times; after
//! that the lease lapses on its own unless the holder releases first.

use crate::error::LockError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use warden_adapters::{CoordinationStore, SetOutcome};
use warden_core::{lease_seconds, renewal_interval, LockConfig, OwnerToken, TokenGen, UuidTokenGen};

/// A held lock, as seen by the caller that acquired it
#[derive(Clone, Debug)]
pub struct Lease {
    key: String,
    owner: OwnerToken,
    duration: Duration,
    renew_every: Duration,
    acquired_at: Instant,
}

impl Lease {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn owner(&self) -> &OwnerToken {
        &self.owner
    }

    /// Lease length written to the store, in whole seconds
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn renewal_interval(&self) -> Duration {
        self.renew_every
    }

    pub fn acquired_at(&self) -> Instant {
        self.acquired_at
    }
}

/// Local renewal task registered for a key
struct Renewal {
    owner: OwnerToken,
    cancel: CancellationToken,
    generation: u64,
}

type Registry = Arc<Mutex<HashMap<String, Renewal>>>;

/// Acquires and releases named locks, renewing held leases in the background
pub struct LockManager<S, G = UuidTokenGen> {
    store: Arc<S>,
    config: LockConfig,
    tokens: G,
    renewals: Registry,
    generation: AtomicU64,
}

impl<S: CoordinationStore> LockManager<S, UuidTokenGen> {
    pub fn new(store: S, config: LockConfig) -> Self {
        Self::with_tokens(store, config, UuidTokenGen::new())
    }
}

impl<S: CoordinationStore, G: TokenGen> LockManager<S, G> {
    pub fn with_tokens(store: S, config: LockConfig, tokens: G) -> Self {
        Self {
            store: Arc::new(store),
            config,
            tokens,
            renewals: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Acquire `key` for `owner`, spinning until it is free.
    ///
    /// Each failed attempt, whether the key is held or the store errored,
    /// sleeps for the configured backoff before retrying. Gives up with
    /// [`LockError::SeizeTimeout`] once `acquire_timeout` elapses or `cancel`
    /// fires. A zero `acquire_timeout`, or one too large to represent as a
    /// deadline, waits without one.
    ///
    /// The renewal task started on success runs on a child of `cancel`.
    pub async fn acquire(
        &self,
        key: &str,
        owner: &OwnerToken,
        lease: Duration,
        acquire_timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<Lease, LockError> {
        let ttl = whole_seconds(lease)?;
        let deadline = if acquire_timeout.is_zero() {
            None
        } else {
            Instant::now().checked_add(acquire_timeout)
        };
        let mut attempts: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(self.timed_out(key, attempts));
            }

            attempts += 1;
            match self.store.set_if_absent(key, owner.as_str(), ttl).await {
                Ok(SetOutcome::Acquired) => {
                    tracing::info!(key, %owner, attempts, "lock acquired");
                    return Ok(self.start_renewal(key, owner, ttl, cancel));
                }
                Ok(SetOutcome::Exists) => tracing::debug!(key, attempts, "lock contended"),
                Err(e) => tracing::warn!(key, attempts, error = %e, "lock attempt failed"),
            }

            let until_deadline = async {
                match deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.timed_out(key, attempts)),
                _ = until_deadline => return Err(self.timed_out(key, attempts)),
                _ = tokio::time::sleep(self.config.backoff) => {}
            }
        }
    }

    /// Make a single attempt at `key`.
    ///
    /// Returns `Ok(None)` when another owner holds it. Store failures are
    /// returned rather than retried.
    pub async fn try_acquire(
        &self,
        key: &str,
        owner: &OwnerToken,
        lease: Duration,
        cancel: &CancellationToken,
    ) -> Result<Option<Lease>, LockError> {
        let ttl = whole_seconds(lease)?;
        match self.store.set_if_absent(key, owner.as_str(), ttl).await? {
            SetOutcome::Acquired => {
                tracing::info!(key, %owner, "lock acquired");
                Ok(Some(self.start_renewal(key, owner, ttl, cancel)))
            }
            SetOutcome::Exists => {
                tracing::debug!(key, "lock contended");
                Ok(None)
            }
        }
    }

    /// Acquire `key` with a freshly generated owner token and the configured lease
    pub async fn acquire_default(
        &self,
        key: &str,
        acquire_timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<Lease, LockError> {
        let owner = self.tokens.next();
        self.acquire(key, &owner, self.config.lease, acquire_timeout, cancel)
            .await
    }

    /// Release `key` if `owner` still holds it.
    ///
    /// Stops the local renewal for `(key, owner)` first. Releasing a lock
    /// held by someone else, an absent key, or a store failure are all
    /// no-ops for the caller.
    pub async fn release(&self, key: &str, owner: &OwnerToken) {
        self.stop_renewal(key, owner);

        match self.store.delete_if_equals(key, owner.as_str()).await {
            Ok(true) => tracing::info!(key, %owner, "lock released"),
            Ok(false) => tracing::debug!(key, %owner, "lock not held by owner"),
            Err(e) => tracing::warn!(key, %owner, error = %e, "lock release failed"),
        }
    }

    /// Whether a renewal task is still running locally for `key`
    pub fn renewing(&self, key: &str) -> bool {
        lock_registry(&self.renewals).contains_key(key)
    }

    fn timed_out(&self, key: &str, attempts: u32) -> LockError {
        tracing::warn!(key, attempts, "gave up seizing lock");
        LockError::SeizeTimeout {
            key: key.to_string(),
        }
    }

    fn start_renewal(
        &self,
        key: &str,
        owner: &OwnerToken,
        ttl: Duration,
        cancel: &CancellationToken,
    ) -> Lease {
        let interval = renewal_interval(ttl);
        let token = cancel.child_token();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let acquired_at = Instant::now();

        // A previous renewal for this key belongs to a lease that has lapsed
        let previous = lock_registry(&self.renewals).insert(
            key.to_string(),
            Renewal {
                owner: owner.clone(),
                cancel: token.clone(),
                generation,
            },
        );
        if let Some(previous) = previous {
            previous.cancel.cancel();
        }

        let store = Arc::clone(&self.store);
        let renewals = Arc::clone(&self.renewals);
        let max_renewals = self.config.max_renewals;
        let task_key = key.to_string();
        tokio::spawn(async move {
            renew(&*store, &task_key, acquired_at, interval, max_renewals, &token).await;

            let mut renewals = lock_registry(&renewals);
            if renewals
                .get(&task_key)
                .is_some_and(|r| r.generation == generation)
            {
                renewals.remove(&task_key);
            }
        });

        Lease {
            key: key.to_string(),
            owner: owner.clone(),
            duration: ttl,
            renew_every: interval,
            acquired_at,
        }
    }

    fn stop_renewal(&self, key: &str, owner: &OwnerToken) {
        let mut renewals = lock_registry(&self.renewals);
        if renewals.get(key).is_some_and(|r| &r.owner == owner) {
            if let Some(renewal) = renewals.remove(key) {
                renewal.cancel.cancel();
            }
        }
    }
}

/// Refresh `key` every `interval` from `acquired_at`, at most `max_renewals` times.
///
/// Ticks stay on the schedule set at acquisition, so store latency does not
/// push later refreshes past the expiry.
async fn renew<S: CoordinationStore>(
    store: &S,
    key: &str,
    acquired_at: Instant,
    interval: Duration,
    max_renewals: u32,
    cancel: &CancellationToken,
) {
    let Some(first) = acquired_at.checked_add(interval) else {
        tracing::debug!(key, ?interval, "renewal interval out of range");
        return;
    };
    let mut ticks = tokio::time::interval_at(first, interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    for cycle in 1..=max_renewals {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(key, cycle, "renewal stopped");
                return;
            }
            _ = ticks.tick() => {}
        }

        // Failures still spend a cycle
        match store.refresh_expiry(key, interval).await {
            Ok(()) => tracing::debug!(key, cycle, "lease renewed"),
            Err(e) => tracing::warn!(key, cycle, error = %e, "lease renewal failed"),
        }
    }
    tracing::debug!(key, max_renewals, "renewal budget spent");
}

fn whole_seconds(lease: Duration) -> Result<Duration, LockError> {
    if lease < Duration::from_secs(1) {
        return Err(LockError::InvalidLease(lease));
    }
    Ok(Duration::from_secs(lease_seconds(lease)))
}

fn lock_registry(renewals: &Registry) -> std::sync::MutexGuard<'_, HashMap<String, Renewal>> {
    renewals.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
