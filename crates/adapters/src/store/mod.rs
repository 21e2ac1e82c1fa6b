// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination store adapters
//!
//! The lock manager only needs four primitives from a shared key-value
//! store: conditional set with expiry, get, delete and expiry refresh.
//! `delete_if_equals` has a non-atomic default built from `get` + `delete`;
//! stores that can compare-and-delete in one step override it.

mod memory;
mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, StoreCall};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors from coordination store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    Connection(String),
    #[error("store command failed: {0}")]
    Command(String),
}

/// Result of a conditional set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The key was absent and now holds the value
    Acquired,
    /// The key already held a value; nothing was written
    Exists,
}

/// Client for a shared key-value coordination store
#[async_trait]
pub trait CoordinationStore: Clone + Send + Sync + 'static {
    /// Set `key = value` with expiry `ttl` only if `key` is absent
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<SetOutcome, StoreError>;

    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove `key`; removing an absent key succeeds
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Reset the expiry of `key` to `ttl` without touching its value.
    ///
    /// Fails with [`StoreError::NotFound`] when the key is absent.
    async fn refresh_expiry(&self, key: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Remove `key` only if it currently holds `value`.
    ///
    /// Returns whether the key was removed. The default implementation reads
    /// then deletes in two round trips, so another writer can slip in between.
    async fn delete_if_equals(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        match self.get(key).await? {
            Some(current) if current == value => {
                self.delete(key).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
