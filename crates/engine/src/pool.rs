// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded pool of long-lived resources
//!
//! Idle resources wait in a FIFO queue. `get` hands out the oldest one after
//! dropping any that sat idle too long or fail the manager's liveness check,
//! and creates a new one when the queue runs dry. `put` returns a resource to
//! the back of the queue, so reuse is round-robin.

use crate::error::PoolError;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use warden_adapters::ResourceManager;
use warden_core::{CheckoutPolicy, Clock, PoolConfig, SystemClock};

/// Lifetime counters for a pool
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Resources created, including the initial fill
    pub created: u64,
    /// Resources destroyed for any reason
    pub destroyed: u64,
    /// Destroyed on checkout after sitting idle past the timeout
    pub evicted_idle: u64,
    /// Destroyed on checkout after failing the liveness check
    pub evicted_unhealthy: u64,
    /// Destroyed on return because the idle queue was full
    pub overflow: u64,
}

struct Idle<R> {
    resource: R,
    returned_at: Instant,
}

struct PoolState<R> {
    idle: VecDeque<Idle<R>>,
    /// Resources created and not yet destroyed, idle or checked out
    open: usize,
    closed: bool,
    stats: PoolStats,
}

/// Why a resource is being destroyed
#[derive(Clone, Copy, Debug)]
enum Disposal {
    IdleTimeout,
    Unhealthy,
    Overflow,
    Closed,
}

/// Pool of resources made by a [`ResourceManager`]
pub struct Pool<M: ResourceManager, C: Clock = SystemClock> {
    config: PoolConfig,
    manager: M,
    clock: C,
    state: Mutex<PoolState<M::Resource>>,
}

impl<M: ResourceManager> Pool<M, SystemClock> {
    pub async fn new(config: PoolConfig, manager: M) -> Result<Self, PoolError> {
        Self::with_clock(config, manager, SystemClock).await
    }
}

impl<M: ResourceManager, C: Clock> Pool<M, C> {
    /// Validate `config` and eagerly create `config.initial` resources.
    ///
    /// If any creation fails, everything created so far is destroyed and the
    /// error is returned as [`PoolError::Fill`].
    pub async fn with_clock(config: PoolConfig, manager: M, clock: C) -> Result<Self, PoolError> {
        config.validate()?;

        let mut idle = VecDeque::with_capacity(config.max);
        for _ in 0..config.initial {
            match manager.create().await {
                Ok(resource) => idle.push_back(Idle {
                    resource,
                    returned_at: clock.now(),
                }),
                Err(e) => {
                    tracing::warn!(created = idle.len(), error = %e, "pool fill failed");
                    for entry in idle.drain(..) {
                        if let Err(err) = manager.destroy(entry.resource).await {
                            tracing::warn!(error = %err, "destroy after failed fill");
                        }
                    }
                    return Err(PoolError::Fill(e));
                }
            }
        }

        let open = idle.len();
        tracing::info!(
            initial = config.initial,
            max = config.max,
            checkout = ?config.checkout,
            "pool filled"
        );
        Ok(Self {
            config,
            manager,
            clock,
            state: Mutex::new(PoolState {
                idle,
                open,
                closed: false,
                stats: PoolStats {
                    created: open as u64,
                    ..PoolStats::default()
                },
            }),
        })
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }

    /// Check out a resource.
    ///
    /// The caller owns it until it goes back through [`Pool::put`] or
    /// [`Pool::close`].
    pub async fn get(&self) -> Result<M::Resource, PoolError> {
        loop {
            let entry = {
                let mut state = self.state();
                if state.closed {
                    return Err(PoolError::Closed);
                }
                match state.idle.pop_front() {
                    Some(entry) => entry,
                    None => break,
                }
            };

            if self.config.evicts_idle()
                && self.clock.since(entry.returned_at) > self.config.idle_timeout
            {
                tracing::debug!("evicting idle resource");
                self.dispose(entry.resource, Disposal::IdleTimeout).await;
                continue;
            }

            if self.manager.checks_liveness() {
                if let Err(e) = self.manager.check(&entry.resource).await {
                    tracing::warn!(error = %e, "evicting unhealthy resource");
                    self.dispose(entry.resource, Disposal::Unhealthy).await;
                    continue;
                }
            }

            return Ok(entry.resource);
        }

        self.create().await
    }

    /// Return a checked-out resource to the back of the idle queue.
    ///
    /// A full queue destroys the resource instead. A released pool destroys
    /// it and reports [`PoolError::Closed`].
    pub async fn put(&self, resource: M::Resource) -> Result<(), PoolError> {
        let rejected = {
            let mut state = self.state();
            if state.closed {
                Some((resource, Disposal::Closed))
            } else if state.idle.len() >= self.config.max {
                Some((resource, Disposal::Overflow))
            } else {
                state.idle.push_back(Idle {
                    resource,
                    returned_at: self.clock.now(),
                });
                None
            }
        };

        match rejected {
            None => Ok(()),
            Some((resource, Disposal::Closed)) => {
                self.dispose(resource, Disposal::Closed).await;
                Err(PoolError::Closed)
            }
            Some((resource, reason)) => {
                tracing::debug!(max = self.config.max, "idle queue full; destroying resource");
                self.dispose(resource, reason).await;
                Ok(())
            }
        }
    }

    /// Destroy a checked-out resource instead of returning it.
    ///
    /// Works after [`Pool::release`].
    pub async fn close(&self, resource: M::Resource) -> Result<(), PoolError> {
        let result = self.manager.destroy(resource).await;
        self.forget(None);
        result.map_err(PoolError::from)
    }

    /// Destroy every idle resource and refuse further checkouts.
    ///
    /// Resources still checked out are not tracked; their holders dispose of
    /// them with [`Pool::close`]. Releasing twice is a no-op.
    pub async fn release(&self) {
        let drained: Vec<_> = {
            let mut state = self.state();
            if state.closed {
                return;
            }
            state.closed = true;
            state.idle.drain(..).collect()
        };

        let count = drained.len();
        for entry in drained {
            self.dispose(entry.resource, Disposal::Closed).await;
        }
        tracing::info!(destroyed = count, "pool released");
    }

    /// Number of idle resources
    pub fn len(&self) -> usize {
        self.state().idle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of open resources, idle or checked out
    pub fn open(&self) -> usize {
        self.state().open
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    pub fn stats(&self) -> PoolStats {
        self.state().stats
    }

    async fn create(&self) -> Result<M::Resource, PoolError> {
        // Reserve a slot before the slow create
        {
            let mut state = self.state();
            if state.closed {
                return Err(PoolError::Closed);
            }
            if self.config.checkout == CheckoutPolicy::Bounded && state.open >= self.config.max {
                tracing::debug!(max = self.config.max, "pool exhausted");
                return Err(PoolError::Exhausted {
                    max: self.config.max,
                });
            }
            state.open += 1;
        }

        match self.manager.create().await {
            Ok(resource) => {
                let mut state = self.state();
                state.stats.created += 1;
                tracing::debug!(open = state.open, "created resource");
                Ok(resource)
            }
            Err(e) => {
                let mut state = self.state();
                state.open = state.open.saturating_sub(1);
                tracing::warn!(error = %e, "resource create failed");
                Err(PoolError::Resource(e))
            }
        }
    }

    async fn dispose(&self, resource: M::Resource, reason: Disposal) {
        if let Err(e) = self.manager.destroy(resource).await {
            tracing::warn!(error = %e, ?reason, "resource destroy failed");
        }
        self.forget(Some(reason));
    }

    /// Account for a destroyed resource
    fn forget(&self, reason: Option<Disposal>) {
        let mut state = self.state();
        state.open = state.open.saturating_sub(1);
        state.stats.destroyed += 1;
        match reason {
            Some(Disposal::IdleTimeout) => state.stats.evicted_idle += 1,
            Some(Disposal::Unhealthy) => state.stats.evicted_unhealthy += 1,
            Some(Disposal::Overflow) => state.stats.overflow += 1,
            Some(Disposal::Closed) | None => {}
        }
    }

    fn state(&self) -> MutexGuard<'_, PoolState<M::Resource>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
