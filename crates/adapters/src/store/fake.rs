// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake coordination store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CoordinationStore, MemoryStore, SetOutcome, StoreError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use warden_core::{Clock, TokioClock};

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    SetIfAbsent {
        key: String,
        value: String,
        ttl: Duration,
    },
    Get {
        key: String,
    },
    Delete {
        key: String,
    },
    RefreshExpiry {
        key: String,
        ttl: Duration,
    },
    DeleteIfEquals {
        key: String,
        value: String,
    },
}

#[derive(Default)]
struct Failures {
    /// Every call fails with a connection error
    unavailable: bool,
    /// Only refresh calls fail
    refresh: bool,
    /// Delay before a refresh is applied
    refresh_latency: Duration,
}

/// Fake coordination store with call recording and failure injection.
///
/// Backed by a [`MemoryStore`] on tokio's clock so paused test runtimes
/// drive key expiry.
#[derive(Clone)]
pub struct FakeStore<C: Clock = TokioClock> {
    inner: MemoryStore<C>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    failures: Arc<Mutex<Failures>>,
}

impl Default for FakeStore<TokioClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeStore<TokioClock> {
    pub fn new() -> Self {
        Self::with_clock(TokioClock)
    }
}

impl<C: Clock> FakeStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            inner: MemoryStore::with_clock(clock),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(Failures::default())),
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Count recorded refresh calls for `key`
    pub fn refresh_count(&self, key: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, StoreCall::RefreshExpiry { key: k, .. } if k == key))
            .count()
    }

    /// Clear recorded calls
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Make every call fail as if the store were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .unavailable = unavailable;
    }

    /// Make refresh calls fail
    pub fn set_refresh_fails(&self, fails: bool) {
        self.failures.lock().unwrap_or_else(|e| e.into_inner()).refresh = fails;
    }

    /// Delay each refresh by `latency` before it reaches the store
    pub fn set_refresh_latency(&self, latency: Duration) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .refresh_latency = latency;
    }

    /// Current value under `key`, bypassing call recording
    pub fn value(&self, key: &str) -> Option<String> {
        self.inner.value(key)
    }

    /// Remaining TTL of `key`, bypassing call recording
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.inner.ttl(key)
    }

    fn record(&self, call: StoreCall) -> Result<(), StoreError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        if self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .unavailable
        {
            return Err(StoreError::Connection("fake store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl<C: Clock> CoordinationStore for FakeStore<C> {
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<SetOutcome, StoreError> {
        self.record(StoreCall::SetIfAbsent {
            key: key.to_string(),
            value: value.to_string(),
            ttl,
        })?;
        self.inner.set_if_absent(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.record(StoreCall::Get {
            key: key.to_string(),
        })?;
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.record(StoreCall::Delete {
            key: key.to_string(),
        })?;
        self.inner.delete(key).await
    }

    async fn refresh_expiry(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        self.record(StoreCall::RefreshExpiry {
            key: key.to_string(),
            ttl,
        })?;
        let (fails, latency) = {
            let failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
            (failures.refresh, failures.refresh_latency)
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if fails {
            return Err(StoreError::Command("fake refresh failure".to_string()));
        }
        self.inner.refresh_expiry(key, ttl).await
    }

    async fn delete_if_equals(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        self.record(StoreCall::DeleteIfEquals {
            key: key.to_string(),
            value: value.to_string(),
        })?;
        self.inner.delete_if_equals(key, value).await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
