// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process coordination store
//!
//! Locks taken through this store only exclude holders inside the same
//! process. Useful for single-node deployments and tests.
//!
//! As in Redis, a key stays live through its expiry instant and is gone
//! strictly after it. A TTL too large to represent never expires.

use super::{CoordinationStore, SetOutcome, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use warden_core::{Clock, SystemClock};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    /// `None` when the TTL overflowed the clock
    expires_at: Option<Instant>,
}

impl Entry {
    fn live_at(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at >= now)
    }
}

/// Key-value store held in memory with clock-driven expiry
#[derive(Clone, Default)]
pub struct MemoryStore<C: Clock = SystemClock> {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    clock: C,
}

impl MemoryStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> MemoryStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    /// Number of live (unexpired) keys
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, entry| entry.live_at(now));
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of `key`, if it is live
    pub fn value(&self, key: &str) -> Option<String> {
        self.with_live(key, |entries| entries.get(key).map(|entry| entry.value.clone()))
    }

    /// Time left before `key` expires, if it is live
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now();
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|entry| entry.live_at(now))
            .map(|entry| {
                entry
                    .expires_at
                    .map_or(Duration::MAX, |at| at.saturating_duration_since(now))
            })
    }

    /// Run `f` against the live entry for `key`, dropping it first if expired
    fn with_live<T>(&self, key: &str, f: impl FnOnce(&mut HashMap<String, Entry>) -> T) -> T {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.get(key).is_some_and(|entry| !entry.live_at(now)) {
            entries.remove(key);
        }
        f(&mut entries)
    }
}

#[async_trait]
impl<C: Clock> CoordinationStore for MemoryStore<C> {
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<SetOutcome, StoreError> {
        let expires_at = self.clock.now().checked_add(ttl);
        Ok(self.with_live(key, |entries| {
            if entries.contains_key(key) {
                return SetOutcome::Exists;
            }
            entries.insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    expires_at,
                },
            );
            SetOutcome::Acquired
        }))
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.value(key))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.with_live(key, |entries| entries.remove(key));
        Ok(())
    }

    async fn refresh_expiry(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        let expires_at = self.clock.now().checked_add(ttl);
        self.with_live(key, |entries| match entries.get_mut(key) {
            Some(entry) => {
                entry.expires_at = expires_at;
                Ok(())
            }
            None => Err(StoreError::NotFound(key.to_string())),
        })
    }

    async fn delete_if_equals(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        Ok(self.with_live(key, |entries| {
            if entries.get(key).is_some_and(|entry| entry.value == value) {
                entries.remove(key);
                true
            } else {
                false
            }
        }))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
